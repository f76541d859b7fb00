//! Record type: one row of export input

use crate::cell::CellValue;

/// An ordered list of `(column name, value)` pairs
///
/// Column order is explicit: the first record of an export defines the
/// header order for the whole table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record with room for `capacity` fields
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Set a field. An existing column keeps its position and gets the new value.
    pub fn push<S, V>(&mut self, column: S, value: V)
    where
        S: Into<String>,
        V: Into<CellValue>,
    {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Builder form of [`Record::push`]
    pub fn with<S, V>(mut self, column: S, value: V) -> Self
    where
        S: Into<String>,
        V: Into<CellValue>,
    {
        self.push(column, value);
        self
    }

    /// Look up a value by column name
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Value at a position, if that position holds `column`
    pub(crate) fn get_at(&self, index: usize, column: &str) -> Option<&CellValue> {
        match self.fields.get(index) {
            Some((name, value)) if name == column => Some(value),
            _ => self.get(column),
        }
    }

    /// Column names in order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(column, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S, V> FromIterator<(S, V)> for Record
where
    S: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.push(column, value);
        }
        record
    }
}
