//! # rangwat-xlsx
//!
//! Builds minimal single-sheet XLSX (Office Open XML) packages from tabular
//! data, and reads the first sheet of an XLSX file back into rows.
//!
//! ## Example
//!
//! ```rust
//! use rangwat_core::{ColumnWidths, Record};
//! use rangwat_xlsx::generate_xlsx;
//!
//! let records = vec![Record::new().with("A", "x").with("B", 1)];
//! let widths = ColumnWidths::new().with("A", 20.0);
//!
//! let bytes = generate_xlsx("Sheet1", &records, Some(&widths)).unwrap();
//! assert_eq!(&bytes[..2], b"PK");
//! ```

pub mod error;
pub mod reader;
pub mod shared_strings;
pub mod writer;

mod styles;
mod xml;

pub use error::{XlsxError, XlsxResult};
pub use reader::{SheetContents, XlsxReader};
pub use shared_strings::SharedStringTable;
pub use writer::{generate_xlsx, XlsxWriter};

/// MIME type of an XLSX download
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
