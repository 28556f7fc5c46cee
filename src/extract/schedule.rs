//! Class-schedule extraction from text lines and table rows.

use super::patterns::{capitalize, contains_any, first_capture, row_has_keyword, row_text};
use crate::output::ScheduleItem;
use crate::pipeline::source::SourceDocument;
use once_cell::sync::Lazy;
use regex::Regex;

const DAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

static RE_TIME_MERIDIEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,2}:\d{2}\s*[AP]M)").unwrap());

static RE_TIME_CLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2}:\d{2})").unwrap());

static RE_TIME_HOUR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d{1,2}[AP]M)").unwrap());

static RE_ROOM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)room\s*(\d+)").unwrap());

static RE_BUILDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)building\s*([A-Z]+)").unwrap());

static RE_ROOM_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([A-Z]+\s*\d+)").unwrap());

// Table rows only; uppercase letters.
static RE_ROOM_CODE_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+\s*\d+)").unwrap());

/// Extract schedule entries: text lines first (line order), then table rows.
pub fn extract_schedule(source: &SourceDocument) -> Vec<ScheduleItem> {
    let mut schedule = Vec::new();

    let time_patterns: [&Regex; 3] = [&*RE_TIME_MERIDIEM, &*RE_TIME_CLOCK, &*RE_TIME_HOUR];
    let location_patterns: [&Regex; 3] = [&*RE_ROOM, &*RE_BUILDING, &*RE_ROOM_CODE];

    for line in source.lines() {
        let line_lower = line.trim().to_lowercase();
        if !contains_any(&line_lower, DAYS) {
            continue;
        }
        schedule.push(ScheduleItem {
            day: first_day(&line_lower),
            time: first_capture(&time_patterns, line),
            location: first_capture(&location_patterns, line),
            description: line.to_string(),
        });
    }

    for row in source.tables.iter().flatten() {
        if !row_has_keyword(row, DAYS) {
            continue;
        }
        let text = row_text(row);
        schedule.push(ScheduleItem {
            day: first_day(&text.to_lowercase()),
            time: first_capture(&[&*RE_TIME_MERIDIEM], &text),
            location: first_capture(&[&*RE_ROOM_CODE_UPPER], &text),
            description: text,
        });
    }

    schedule
}

/// First weekday of the fixed Monday..Sunday list that occurs anywhere in
/// the text. List order wins over position: "Friday and Monday" → "Monday".
fn first_day(text_lower: &str) -> String {
    DAYS.iter()
        .find(|day| text_lower.contains(*day))
        .map(|day| capitalize(day))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Table;

    fn from_text(text: &str) -> Vec<ScheduleItem> {
        extract_schedule(&SourceDocument::from_text(text))
    }

    #[test]
    fn day_time_room() {
        assert_eq!(
            from_text("Monday 9:00 AM Room 101"),
            vec![ScheduleItem {
                day: "Monday".into(),
                time: "9:00 AM".into(),
                location: "101".into(),
                description: "Monday 9:00 AM Room 101".into(),
            }]
        );
    }

    #[test]
    fn day_uses_list_order_not_position() {
        let got = from_text("Lectures on Friday and Monday");
        assert_eq!(got[0].day, "Monday");
    }

    #[test]
    fn time_falls_back_to_clock_then_hour() {
        assert_eq!(from_text("Tuesday 14:30 lab")[0].time, "14:30");
        assert_eq!(from_text("Thursday at 3pm")[0].time, "3pm");
        assert_eq!(from_text("Sunday review session")[0].time, "");
    }

    #[test]
    fn location_cascade() {
        assert_eq!(from_text("Wednesday building B")[0].location, "B");
        assert_eq!(from_text("Monday Room 101")[0].location, "101");
        // The bare code pattern ignores case, so the weekday and hour match first.
        assert_eq!(from_text("Tuesday 10:00 AM HSS 101")[0].location, "Tuesday 10");
        assert_eq!(from_text("Friday 10:00 AM online")[0].location, "Friday 10");
        assert_eq!(from_text("Sunday review session")[0].location, "");
    }

    #[test]
    fn description_keeps_the_full_line() {
        let line = format!("  Saturday workshop {}  ", "z".repeat(300));
        let got = from_text(&line);
        assert_eq!(got[0].description, line);
        assert_eq!(got[0].day, "Saturday");
    }

    #[test]
    fn table_rows_use_the_narrow_patterns() {
        let tables: Vec<Table> = vec![vec![
            vec![Some("Day".into()), Some("Time".into()), Some("Room".into())],
            vec![
                Some("Wednesday".into()),
                Some("14:00".into()),
                Some("ENG 210".into()),
            ],
            vec![
                Some("Thursday".into()),
                None,
                Some("2:00 pm".into()),
                Some("Lab B12".into()),
            ],
        ]];
        let got = extract_schedule(&SourceDocument::default().with_tables(tables));
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].day, "Wednesday");
        assert_eq!(got[0].time, "");
        assert_eq!(got[0].location, "ENG 210");
        assert_eq!(got[0].description, "Wednesday 14:00 ENG 210");
        assert_eq!(got[1].day, "Thursday");
        assert_eq!(got[1].time, "2:00 pm");
        assert_eq!(got[1].location, "B12");
    }

    #[test]
    fn no_weekdays_no_schedule() {
        assert!(from_text("Grading: 40% exams, 60% homework").is_empty());
    }
}
