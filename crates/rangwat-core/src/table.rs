//! Table and schema types

use crate::cell::{CellRange, CellValue};
use crate::error::{Error, Result};
use crate::record::Record;
use crate::{MAX_COLS, MAX_ROWS};

/// Ordered column names of a table (the header row)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Create a schema from column names
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Uniform rows under one schema
///
/// Every row holds exactly one value per schema column, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create a table, checking that every row matches the schema width
    ///
    /// A table needs at least one column and one data row.
    pub fn new(schema: Schema, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        if rows.is_empty() || schema.is_empty() {
            return Err(Error::EmptyData);
        }

        for (idx, row) in rows.iter().enumerate() {
            if row.len() != schema.len() {
                return Err(Error::RowLength {
                    row: idx,
                    expected: schema.len(),
                    actual: row.len(),
                });
            }
        }

        let table = Self { schema, rows };
        table.check_bounds()?;
        table.check_numbers()?;
        Ok(table)
    }

    /// Build a table from records
    ///
    /// The first record's columns become the schema. Later records are read
    /// by column name, so their own field order does not matter; extra
    /// fields are ignored and a missing field is a [`Error::SchemaMismatch`].
    pub fn from_records(records: &[Record]) -> Result<Self> {
        let first = records.first().ok_or(Error::EmptyData)?;
        let schema = Schema::new(first.columns().map(str::to_string).collect());

        let mut rows = Vec::with_capacity(records.len());
        for (row_idx, record) in records.iter().enumerate() {
            let mut row = Vec::with_capacity(schema.len());
            for (col_idx, column) in schema.columns().iter().enumerate() {
                let value = record
                    .get_at(col_idx, column)
                    .ok_or_else(|| Error::SchemaMismatch {
                        row: row_idx,
                        column: column.clone(),
                    })?;
                row.push(value.clone());
            }
            rows.push(row);
        }

        Self::new(schema, rows)
    }

    /// Build a table from a grid whose first row is the header
    ///
    /// Short data rows are padded with [`CellValue::Empty`]; cells beyond
    /// the header width are dropped.
    pub fn from_grid(mut grid: Vec<Vec<CellValue>>) -> Result<Self> {
        if grid.is_empty() {
            return Err(Error::EmptyData);
        }

        let header = grid.remove(0);
        let schema = Schema::new(header.iter().map(|v| v.to_text().into_owned()).collect());

        let rows = grid
            .into_iter()
            .map(|mut row| {
                row.resize(schema.len(), CellValue::Empty);
                row
            })
            .collect();

        Self::new(schema, rows)
    }

    /// The table schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Data rows (without the header)
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Value at a data row / column position
    pub fn value(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Range covering the header and all data rows (`A1:<last col><rows + 1>`)
    pub fn dimension(&self) -> CellRange {
        let last_col = self.schema.len().saturating_sub(1) as u16;
        CellRange::from_indices(0, 0, self.rows.len() as u32, last_col)
    }

    fn check_bounds(&self) -> Result<()> {
        if self.schema.len() > MAX_COLS as usize {
            return Err(Error::ColumnOutOfBounds(
                self.schema.len() - 1,
                MAX_COLS - 1,
            ));
        }
        // Header takes the first sheet row
        if self.rows.len() >= MAX_ROWS as usize {
            return Err(Error::RowOutOfBounds(
                self.rows.len().min(u32::MAX as usize) as u32,
                MAX_ROWS - 1,
            ));
        }
        Ok(())
    }

    fn check_numbers(&self) -> Result<()> {
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                if let CellValue::Number(n) = value {
                    if !n.is_finite() {
                        return Err(Error::NonFiniteNumber {
                            row: row_idx,
                            column: self.schema.columns()[col_idx].clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
