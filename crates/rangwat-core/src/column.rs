//! Column types

use ahash::AHashMap;

use crate::table::Schema;

/// Width used for columns without a configured width
pub const DEFAULT_COLUMN_WIDTH: f64 = 15.0;

/// Column width definition (for reader/writer use)
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnData {
    /// Start column index (0-based)
    pub min: u16,
    /// End column index (inclusive)
    pub max: u16,
    /// Width in character units
    pub width: f64,
}

impl ColumnData {
    /// Create column data for a single column
    pub fn single(index: u16, width: f64) -> Self {
        Self {
            min: index,
            max: index,
            width,
        }
    }

    /// Whether `index` falls inside this definition
    pub fn contains(&self, index: u16) -> bool {
        (self.min..=self.max).contains(&index)
    }
}

/// Display widths keyed by column name
///
/// Columns without an entry, or with a width that is not a positive finite
/// number, use [`DEFAULT_COLUMN_WIDTH`].
#[derive(Debug, Clone, Default)]
pub struct ColumnWidths {
    widths: AHashMap<String, f64>,
}

impl ColumnWidths {
    /// Create an empty width map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the width of a column
    pub fn set<S: Into<String>>(&mut self, column: S, width: f64) {
        self.widths.insert(column.into(), width);
    }

    /// Builder form of [`ColumnWidths::set`]
    pub fn with<S: Into<String>>(mut self, column: S, width: f64) -> Self {
        self.set(column, width);
        self
    }

    /// Width for a column, falling back to the default
    pub fn width_for(&self, column: &str) -> f64 {
        match self.widths.get(column) {
            Some(&w) if w.is_finite() && w > 0.0 => w,
            _ => DEFAULT_COLUMN_WIDTH,
        }
    }

    /// Number of configured columns
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Check if no widths are configured
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// One definition per schema column, in header order
    pub fn resolve(&self, schema: &Schema) -> Vec<ColumnData> {
        schema
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| ColumnData::single(idx as u16, self.width_for(name)))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ColumnWidths {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut widths = Self::new();
        for (column, width) in iter {
            widths.set(column, width);
        }
        widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_width_fallback() {
        let widths = ColumnWidths::new()
            .with("name", 25.0)
            .with("zero", 0.0)
            .with("nan", f64::NAN);

        assert_eq!(widths.width_for("name"), 25.0);
        assert_eq!(widths.width_for("missing"), DEFAULT_COLUMN_WIDTH);
        assert_eq!(widths.width_for("zero"), DEFAULT_COLUMN_WIDTH);
        assert_eq!(widths.width_for("nan"), DEFAULT_COLUMN_WIDTH);
    }

    #[test]
    fn test_resolve_follows_schema_order() {
        let schema = Schema::new(vec!["b".to_string(), "a".to_string()]);
        let widths: ColumnWidths = [("a", 8.5)].into_iter().collect();

        assert_eq!(
            widths.resolve(&schema),
            vec![ColumnData::single(0, 15.0), ColumnData::single(1, 8.5)]
        );
    }
}
