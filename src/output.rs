//! Output types: the four extracted record collections and the envelope
//! returned by the document-level API.
//!
//! Every string field uses the empty string as its "not found" value and
//! every list uses an empty `Vec`; nothing is ever `null` in the serialised
//! JSON. Records are plain values created fresh on each parse call.

use serde::{Deserialize, Serialize};

/// One table row: a cell is `None` when the source had no text in it.
pub type Row = Vec<Option<String>>;

/// One detected table, rows in top-to-bottom order.
pub type Table = Vec<Row>;

/// Basic course metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub course_name: String,
    /// Uppercased code such as `CS 101` or `MATH2410A`.
    pub course_code: String,
    pub instructor: String,
    /// Capitalised season: `Spring`, `Summer`, `Fall` or `Winter`.
    pub semester: String,
    pub year: String,
}

/// A graded piece of work, e.g. `Homework 3`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Capitalised type keyword followed by its number, never empty.
    pub title: String,
    /// Date exactly as written in the source, or empty.
    pub due_date: String,
    /// Originating line (capped) or table row text.
    pub description: String,
}

/// A recurring class meeting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    /// Capitalised weekday name, or empty.
    pub day: String,
    pub time: String,
    pub location: String,
    /// The full originating line or row text.
    pub description: String,
}

/// A deadline, exam, holiday or break.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantDate {
    /// The whole originating line, trimmed.
    pub title: String,
    pub date: String,
    /// The originating line, untrimmed.
    pub description: String,
}

/// Combined result of the four extractors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub course_info: CourseInfo,
    pub assignments: Vec<Assignment>,
    pub schedule: Vec<ScheduleItem>,
    pub important_dates: Vec<ImportantDate>,
    /// Leading slice of the source text, with `...` appended when cut.
    pub raw_text: String,
}

/// PDF document metadata extracted without running the extractors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

/// Counters and timings for one parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Pages that contributed text.
    pub pages: usize,
    /// Characters in the full source text (not the truncated `raw_text`).
    pub text_chars: usize,
    pub tables: usize,
    pub assignments: usize,
    pub schedule_items: usize,
    pub important_dates: usize,
    pub extract_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything the document-level API returns for one syllabus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllabusOutput {
    pub data: ParseResult,
    /// Echoed back from the configuration; not used by extraction.
    pub semester_start_date: Option<String>,
    pub metadata: DocumentMetadata,
    pub stats: ParseStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_result_serialises_empty_sentinels() {
        let json = serde_json::to_value(ParseResult::default()).unwrap();
        assert_eq!(json["course_info"]["course_code"], "");
        assert_eq!(json["course_info"]["year"], "");
        assert_eq!(json["assignments"], serde_json::json!([]));
        assert_eq!(json["schedule"], serde_json::json!([]));
        assert_eq!(json["important_dates"], serde_json::json!([]));
        assert_eq!(json["raw_text"], "");
    }

    #[test]
    fn tables_deserialise_with_null_cells() {
        let tables: Vec<Table> =
            serde_json::from_str(r#"[[["Quiz 1", null, "02/01/2024"]]]"#).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0][0][1], None);
        assert_eq!(tables[0][0][2].as_deref(), Some("02/01/2024"));
    }
}
