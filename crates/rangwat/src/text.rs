//! Text normalization for search input

/// Collapse every whitespace run to a single space and trim both ends
///
/// ```
/// use rangwat::normalize_text;
///
/// assert_eq!(normalize_text("  นาย   สมชาย\tใจดี "), "นาย สมชาย ใจดี");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive substring match, like SQL `ILIKE '%needle%'`
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
