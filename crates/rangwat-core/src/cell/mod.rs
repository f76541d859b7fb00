//! Cell-related types

mod address;
mod value;

pub use address::{CellAddress, CellRange};
pub use value::CellValue;
