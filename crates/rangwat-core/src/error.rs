//! Error types for rangwat-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rangwat-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(usize, u16),

    /// No records were supplied, so there is no column order to export
    #[error("No data to export")]
    EmptyData,

    /// A record is missing a column present in the first record
    #[error("Record {row} is missing column '{column}'")]
    SchemaMismatch { row: usize, column: String },

    /// A row does not have one value per schema column
    #[error("Row {row} has {actual} values, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// NaN or infinite number, which has no valid cell representation
    #[error("Record {row} has a non-finite number in column '{column}'")]
    NonFiniteNumber { row: usize, column: String },

    /// Sheet name holding a character XML 1.0 cannot carry in an attribute
    #[error("Invalid sheet name {0:?}: control characters are not allowed")]
    InvalidSheetName(String),
}
