//! Assignment extraction from text lines and table rows.
//!
//! A keyword on its own is not enough: "see the lab safety rules" mentions a
//! lab but names no assignment. A record is emitted only when the keyword is
//! followed by a number or an uppercase roman numeral (`Lab 3`, `Project #2`,
//! `Essay IV`).

use super::patterns::{
    capitalize, contains_any, first_capture, row_has_keyword, row_text, truncate_chars,
};
use crate::output::Assignment;
use crate::pipeline::source::SourceDocument;
use once_cell::sync::Lazy;
use regex::Regex;

const KEYWORDS: &[&str] = &[
    "assignment",
    "homework",
    "project",
    "essay",
    "paper",
    "lab",
    "quiz",
    "exam",
];

/// Maximum characters of the source line kept in a text-pass description.
pub const DESCRIPTION_LIMIT: usize = 200;

static RE_TYPE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:(assignment|homework|project|essay|paper|lab|quiz|exam))\s*#?\s*(\d+|[IVX]+\b)")
        .unwrap()
});

static RE_DUE_COLON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)due\s*:\s*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})").unwrap());

static RE_DUE_DATE_COLON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)due\s*date\s*:\s*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})").unwrap());

pub(crate) static RE_SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})").unwrap());

pub(crate) static RE_ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap());

/// Extract assignments: text lines first (line order), then table rows.
pub fn extract_assignments(source: &SourceDocument) -> Vec<Assignment> {
    let mut assignments = Vec::new();

    let due_patterns: [&Regex; 4] = [
        &*RE_DUE_COLON,
        &*RE_DUE_DATE_COLON,
        &*RE_SLASH_DATE,
        &*RE_ISO_DATE,
    ];

    for line in source.lines() {
        if !contains_any(&line.trim().to_lowercase(), KEYWORDS) {
            continue;
        }
        let Some(title) = assignment_title(line) else {
            continue;
        };
        assignments.push(Assignment {
            title,
            due_date: first_capture(&due_patterns, line),
            description: truncate_chars(line, DESCRIPTION_LIMIT),
        });
    }

    for row in source.tables.iter().flatten() {
        if !row_has_keyword(row, KEYWORDS) {
            continue;
        }
        let text = row_text(row);
        let Some(title) = assignment_title(&text) else {
            continue;
        };
        assignments.push(Assignment {
            title,
            due_date: first_capture(&[&*RE_SLASH_DATE], &text),
            description: text,
        });
    }

    assignments
}

/// `"homework #3 ..."` → `Some("Homework 3")`.
fn assignment_title(text: &str) -> Option<String> {
    let caps = RE_TYPE_NUMBER.captures(text)?;
    Some(format!("{} {}", capitalize(&caps[1]), &caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Table;

    fn from_text(text: &str) -> Vec<Assignment> {
        extract_assignments(&SourceDocument::from_text(text))
    }

    fn cells(cells: &[Option<&str>]) -> Vec<Option<String>> {
        cells.iter().map(|c| c.map(str::to_string)).collect()
    }

    #[test]
    fn due_colon_line() {
        let got = from_text("Assignment #2 due: 01/22/2024");
        assert_eq!(
            got,
            vec![Assignment {
                title: "Assignment 2".into(),
                due_date: "01/22/2024".into(),
                description: "Assignment #2 due: 01/22/2024".into(),
            }]
        );
    }

    #[test]
    fn keyword_without_number_is_skipped() {
        assert!(from_text("Read the lab safety rules before class").is_empty());
        assert!(from_text("Lab Instructions are posted online").is_empty());
    }

    #[test]
    fn roman_numeral_titles() {
        let got = from_text("Essay IV: Reflection (2024-03-15)");
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].title, "Essay IV");
    }

    #[test]
    fn iso_due_date_yields_to_the_bare_date_pattern() {
        // The unanchored D/D/YY pattern runs first and matches inside the ISO date.
        let got = from_text("Essay 4 (2024-03-15)");
        assert_eq!(got[0].due_date, "24-03-15");
    }

    #[test]
    fn keyword_case_is_normalised() {
        let got = from_text("HOMEWORK 5 - chapters 3 and 4");
        assert_eq!(got[0].title, "Homework 5");
        assert_eq!(got[0].due_date, "");
    }

    #[test]
    fn due_date_cascade_prefers_labelled_date() {
        let got = from_text("Project 1 posted 1/10/24, due: 2/14/24");
        assert_eq!(got[0].due_date, "2/14/24");
    }

    #[test]
    fn bare_dash_date_is_accepted() {
        let got = from_text("Quiz 3 on 4-5-2024");
        assert_eq!(got[0].due_date, "4-5-2024");
    }

    #[test]
    fn long_description_is_capped() {
        let line = format!("Paper 1: {}", "x".repeat(300));
        let got = from_text(&line);
        assert_eq!(got[0].description.chars().count(), DESCRIPTION_LIMIT + 3);
        assert!(got[0].description.ends_with("..."));
    }

    #[test]
    fn table_rows_follow_text_lines() {
        let tables: Vec<Table> = vec![vec![
            cells(&[Some("Week"), Some("Topic"), Some("Due")]),
            cells(&[Some("3"), Some("Lab 2"), None, Some("02/05/2024")]),
            cells(&[Some("4"), Some("Reading"), Some("")]),
        ]];
        let source = SourceDocument::from_text("Quiz 1 in class").with_tables(tables);
        let got = extract_assignments(&source);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].title, "Quiz 1");
        assert_eq!(
            got[1],
            Assignment {
                title: "Lab 2".into(),
                due_date: "02/05/2024".into(),
                description: "3 Lab 2 02/05/2024".into(),
            }
        );
    }

    #[test]
    fn table_title_comes_from_the_joined_row() {
        let tables: Vec<Table> = vec![vec![
            cells(&[Some("Lab"), Some("2"), Some("3/4/2024")]),
            cells(&[Some("Lab"), Some("safety"), Some("rules")]),
        ]];
        let got = extract_assignments(&SourceDocument::default().with_tables(tables));
        assert_eq!(
            got,
            vec![Assignment {
                title: "Lab 2".into(),
                due_date: "3/4/2024".into(),
                description: "Lab 2 3/4/2024".into(),
            }]
        );
    }

    #[test]
    fn table_description_is_not_capped() {
        let long = "y".repeat(250);
        let tables: Vec<Table> = vec![vec![cells(&[Some("Exam 1"), Some(long.as_str())])]];
        let got = extract_assignments(&SourceDocument::default().with_tables(tables));
        assert_eq!(got[0].description.len(), "Exam 1 ".len() + 250);
    }

    #[test]
    fn no_keywords_no_assignments() {
        assert!(from_text("Office hours are by appointment.\nBring a calculator.").is_empty());
    }
}
