//! Important-date extraction (deadlines, exams, holidays, breaks).
//!
//! Text lines only; tables are not consulted.

use super::assignments::{RE_ISO_DATE, RE_SLASH_DATE};
use super::patterns::{contains_any, first_capture};
use crate::output::ImportantDate;
use crate::pipeline::source::SourceDocument;
use once_cell::sync::Lazy;
use regex::Regex;

const KEYWORDS: &[&str] = &[
    "deadline", "due", "exam", "test", "final", "midterm", "holiday", "break",
];

// "January 15, 2024", "Dec 1 2024"; any word may stand in for the month.
static RE_LONG_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\w+\s+\d{1,2},?\s+\d{4})").unwrap());

/// Extract important dates in line order.
pub fn extract_important_dates(source: &SourceDocument) -> Vec<ImportantDate> {
    let date_patterns: [&Regex; 3] = [&*RE_SLASH_DATE, &*RE_ISO_DATE, &*RE_LONG_DATE];

    source
        .lines()
        .filter(|line| contains_any(&line.trim().to_lowercase(), KEYWORDS))
        .map(|line| ImportantDate {
            title: line.trim().to_string(),
            date: first_capture(&date_patterns, line),
            description: line.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_text(text: &str) -> Vec<ImportantDate> {
        extract_important_dates(&SourceDocument::from_text(text))
    }

    #[test]
    fn midterm_with_slash_date() {
        assert_eq!(
            from_text("Midterm Exam: 02/15/2024"),
            vec![ImportantDate {
                title: "Midterm Exam: 02/15/2024".into(),
                date: "02/15/2024".into(),
                description: "Midterm Exam: 02/15/2024".into(),
            }]
        );
    }

    #[test]
    fn title_is_trimmed_description_is_not() {
        let got = from_text("   Spring Break 3-11-24   ");
        assert_eq!(got[0].title, "Spring Break 3-11-24");
        assert_eq!(got[0].description, "   Spring Break 3-11-24   ");
        assert_eq!(got[0].date, "3-11-24");
    }

    #[test]
    fn iso_and_long_form_dates() {
        assert_eq!(from_text("Final project deadline 2024-05-01")[0].date, "24-05-01");
        assert_eq!(
            from_text("Thanksgiving holiday: November 28, 2024")[0].date,
            "November 28, 2024"
        );
        assert_eq!(from_text("Final exam Dec 12 2024")[0].date, "Dec 12 2024");
    }

    #[test]
    fn long_form_accepts_any_leading_word() {
        assert_eq!(from_text("Midterm exam: Week 7, 2024")[0].date, "Week 7, 2024");
        assert_eq!(from_text("Final exam Sept. 3 2024")[0].date, "");
    }

    #[test]
    fn keyword_without_date_keeps_empty_date() {
        let got = from_text("No test during reading week");
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].date, "");
    }

    #[test]
    fn lines_without_keywords_are_ignored() {
        assert!(from_text("Welcome to the course\nOffice: Room 12").is_empty());
    }
}
