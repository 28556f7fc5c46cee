//! Shared helpers for the extractors: keyword gates, ordered regex cascades,
//! row flattening and string shaping.

use crate::output::Row;
use regex::Regex;

/// `true` when `haystack_lower` contains any of the (lowercase) keywords.
pub(crate) fn contains_any(haystack_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack_lower.contains(k))
}

/// Try each pattern in order and return capture group 1 of the first one that
/// matches, or an empty string when none do.
pub(crate) fn first_capture(patterns: &[&Regex], text: &str) -> String {
    for re in patterns {
        if let Some(caps) = re.captures(text) {
            if let Some(m) = caps.get(1) {
                return m.as_str().to_string();
            }
        }
    }
    String::new()
}

/// Uppercase the first character and lowercase the rest (`"FALL"` → `"Fall"`).
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Keep at most `limit` characters, appending `...` when anything was cut.
pub(crate) fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
        None => s.to_string(),
    }
}

/// Join the non-empty cells of a row with single spaces.
pub(crate) fn row_text(row: &Row) -> String {
    row.iter()
        .filter_map(|cell| cell.as_deref())
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `true` when any non-empty cell contains one of the keywords.
pub(crate) fn row_has_keyword(row: &Row, keywords: &[&str]) -> bool {
    row.iter()
        .filter_map(|cell| cell.as_deref())
        .filter(|cell| !cell.is_empty())
        .any(|cell| contains_any(&cell.to_lowercase(), keywords))
}
