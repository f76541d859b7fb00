//! # rangwat-csv
//!
//! CSV writer for rangwat tables.

mod error;
mod options;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvWriteOptions, LineTerminator};
pub use writer::CsvWriter;

/// MIME type of a CSV download
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
