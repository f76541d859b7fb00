//! Sheet: a named table ready to be written

use crate::column::{ColumnData, ColumnWidths};
use crate::error::{Error, Result};
use crate::table::Table;

/// A single worksheet to export
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    table: Table,
    column_widths: Option<ColumnWidths>,
}

impl Sheet {
    /// Create a sheet without column width directives
    pub fn new<S: Into<String>>(name: S, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
            column_widths: None,
        }
    }

    /// Attach column widths; every header column then gets a width directive
    pub fn with_column_widths(mut self, widths: ColumnWidths) -> Self {
        self.column_widths = Some(widths);
        self
    }

    /// Visible tab name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check that the name can be written into the workbook part
    ///
    /// C0 control characters (other than tab, LF and CR) and the U+FFFE/U+FFFF
    /// noncharacters have no XML 1.0 form; tab, LF and CR are rejected as
    /// well since attribute normalization would turn them into spaces.
    pub fn validate_name(&self) -> Result<()> {
        if self.name.chars().any(|c| c < ' ' || c == '\u{FFFE}' || c == '\u{FFFF}') {
            return Err(Error::InvalidSheetName(self.name.clone()));
        }
        Ok(())
    }

    /// Sheet contents
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Configured widths, if any
    pub fn column_widths(&self) -> Option<&ColumnWidths> {
        self.column_widths.as_ref()
    }

    /// Resolved width definitions in header order, or `None` when no widths were set
    pub fn columns(&self) -> Option<Vec<ColumnData>> {
        self.column_widths
            .as_ref()
            .map(|widths| widths.resolve(self.table.schema()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn sheet(name: &str) -> Sheet {
        let table = Table::from_records(&[Record::new().with("A", 1)]).unwrap();
        Sheet::new(name, table)
    }

    #[test]
    fn test_validate_name() {
        assert!(sheet("Survey Data").validate_name().is_ok());
        assert!(sheet("ข้อมูล <2567> & co").validate_name().is_ok());

        for bad in ["Tab\u{1}X", "line\nbreak", "tab\there", "\u{FFFE}"] {
            match sheet(bad).validate_name() {
                Err(Error::InvalidSheetName(name)) => assert_eq!(name, bad),
                other => panic!("expected InvalidSheetName for {:?}, got {:?}", bad, other),
            }
        }
    }
}
