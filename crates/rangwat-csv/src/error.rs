//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors from writing CSV output
#[derive(Debug, Error)]
pub enum CsvError {
    /// Writing to the output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Records could not be turned into a table
    #[error("Core error: {0}")]
    Core(#[from] rangwat_core::Error),
}
