//! Cell value types

use std::borrow::Cow;
use std::fmt;

/// Represents the value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing value (null in the source data); written as empty text
    #[default]
    Empty,

    /// Numeric value, written as a literal number cell
    Number(f64),

    /// Text value, written through the shared string table
    String(String),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell holds a number
    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Text form of the value: empty cells become `""`, numbers use the
    /// default `f64` formatting (`42.0` is `"42"`)
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::Number(n) => Cow::Owned(n.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_text_has_no_locale_formatting() {
        assert_eq!(CellValue::from(42).to_text(), "42");
        assert_eq!(CellValue::from(1234567.0).to_text(), "1234567");
        assert_eq!(CellValue::from(3.25).to_text(), "3.25");
        assert_eq!(CellValue::from(-0.5).to_text(), "-0.5");
    }

    #[test]
    fn test_empty_is_blank_text() {
        let value = CellValue::from(None::<&str>);
        assert!(value.is_empty());
        assert_eq!(value.to_text(), "");
        assert_eq!(value.to_string(), "");
    }

    #[test]
    fn test_accessors() {
        let text = CellValue::string("x");
        assert_eq!(text.as_string(), Some("x"));
        assert_eq!(text.as_number(), None);

        let number = CellValue::from(Some(7));
        assert!(number.is_number());
        assert_eq!(number.as_number(), Some(7.0));
    }
}
