//! Shared string table (xl/sharedStrings.xml)

use ahash::AHashMap;

use crate::xml::{escape_cell_text, needs_space_preserve};

/// Deduplicated, ordered table of cell strings
///
/// A string's position is its index; the first appearance of a string fixes
/// its index for the life of the table. Each export owns its own table.
#[derive(Debug, Default, Clone)]
pub struct SharedStringTable {
    /// Unique strings in order of first appearance
    strings: Vec<String>,
    /// Fast lookup for deduplication
    index: AHashMap<String, u32>,
    /// Number of cells referencing the table
    references: u64,
}

impl SharedStringTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `capacity` unique strings
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            strings: Vec::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
            references: 0,
        }
    }

    /// Register a string without counting a cell reference, returning its index
    pub fn intern(&mut self, s: &str) -> u32 {
        if let Some(&idx) = self.index.get(s) {
            return idx;
        }

        let idx = self.strings.len() as u32;
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), idx);
        idx
    }

    /// Register a string for one emitted cell, returning its index
    pub fn reference(&mut self, s: &str) -> u32 {
        self.references += 1;
        self.intern(s)
    }

    /// Get a string by index
    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get(index as usize).map(String::as_str)
    }

    /// Index of a string, if registered
    pub fn index_of(&self, s: &str) -> Option<u32> {
        self.index.get(s).copied()
    }

    /// Number of unique strings (`uniqueCount`)
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Number of cell references emitted (`count`)
    pub fn reference_count(&self) -> u64 {
        self.references
    }

    /// Iterate over the strings in index order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }

    /// Serialize as the `xl/sharedStrings.xml` part
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(128 + self.strings.len() * 24);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(&format!(
            "\n<sst xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" count=\"{}\" uniqueCount=\"{}\">",
            self.references,
            self.strings.len()
        ));

        for s in &self.strings {
            let space = if needs_space_preserve(s) {
                " xml:space=\"preserve\""
            } else {
                ""
            };
            xml.push_str(&format!(
                "\n  <si><t{}>{}</t></si>",
                space,
                escape_cell_text(s)
            ));
        }

        xml.push_str("\n</sst>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_appearance_order() {
        let mut sst = SharedStringTable::new();
        assert_eq!(sst.reference("b"), 0);
        assert_eq!(sst.reference("a"), 1);
        assert_eq!(sst.reference("b"), 0);

        assert_eq!(sst.iter().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(sst.len(), 2);
        assert_eq!(sst.reference_count(), 3);
    }

    #[test]
    fn test_intern_does_not_count_references() {
        let mut sst = SharedStringTable::new();
        sst.intern("header");
        sst.intern("header");

        assert_eq!(sst.len(), 1);
        assert_eq!(sst.reference_count(), 0);
        assert_eq!(sst.index_of("header"), Some(0));
        assert_eq!(sst.get(0), Some("header"));
        assert_eq!(sst.get(1), None);
    }

    #[test]
    fn test_to_xml_counts() {
        let mut sst = SharedStringTable::new();
        sst.reference("x");
        sst.reference("x");
        sst.reference("y");

        let xml = sst.to_xml();
        assert!(xml.contains(r#"count="3" uniqueCount="2""#));
        assert!(xml.contains("<si><t>x</t></si>"));
        assert!(xml.contains("<si><t>y</t></si>"));
    }

    #[test]
    fn test_to_xml_escapes_and_preserves_space() {
        let mut sst = SharedStringTable::new();
        sst.reference(r#"Jane "J" & Co"#);
        sst.reference(" padded ");
        sst.reference("");

        let xml = sst.to_xml();
        assert!(xml.contains("<si><t>Jane &quot;J&quot; &amp; Co</t></si>"));
        assert!(xml.contains(r#"<si><t xml:space="preserve"> padded </t></si>"#));
        assert!(xml.contains("<si><t></t></si>"));
    }
}
