//! # rangwat-core
//!
//! Core data structures shared by the rangwat export crates.
//!
//! - [`CellValue`] - a cell value (text, number or empty)
//! - [`Record`] - one exported row as an ordered list of `(column, value)` pairs
//! - [`Table`] and [`Schema`] - homogeneous rows with an explicit column order
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing
//! - [`ColumnWidths`] - per-column display widths
//! - [`Sheet`] - a named table ready to be written
//!
//! ## Example
//!
//! ```rust
//! use rangwat_core::{Record, Table};
//!
//! let records = vec![
//!     Record::new().with("A", "x").with("B", 1),
//!     Record::new().with("A", "y").with("B", 2),
//! ];
//!
//! let table = Table::from_records(&records).unwrap();
//! assert_eq!(table.schema().columns(), ["A", "B"]);
//! assert_eq!(table.dimension().to_string(), "A1:B3");
//! ```

pub mod cell;
pub mod column;
pub mod error;
pub mod record;
pub mod sheet;
pub mod table;

// Re-exports for convenience
pub use cell::{CellAddress, CellRange, CellValue};
pub use column::{ColumnData, ColumnWidths, DEFAULT_COLUMN_WIDTH};
pub use error::{Error, Result};
pub use record::Record;
pub use sheet::Sheet;
pub use table::{Schema, Table};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
