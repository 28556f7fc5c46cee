//! Course-info extraction: name, code, instructor, semester and year.
//!
//! The four fields are scanned independently over the same lines, so one line
//! may feed several of them. Name, code and instructor keep the first value
//! found; semester and year keep the last.

use super::patterns::{capitalize, contains_any};
use crate::output::CourseInfo;
use crate::pipeline::source::SourceDocument;
use once_cell::sync::Lazy;
use regex::Regex;

const NAME_LABELS: &[&str] = &[
    "course:",
    "class:",
    "subject:",
    "course title:",
    "course name:",
];

const INSTRUCTOR_LABELS: &[&str] = &[
    "instructor:",
    "professor:",
    "teacher:",
    "faculty:",
    "lecturer:",
];

static RE_COURSE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:course|class|subject|course title|course name):\s*([^\n]+)").unwrap()
});

static RE_COURSE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([A-Z]{2,4}\s*\d{3,4}[A-Z]?)").unwrap());

static RE_INSTRUCTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:instructor|professor|teacher|faculty|lecturer):\s*([^\n]+)").unwrap()
});

// Applied to the lowercased line.
static RE_SEMESTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(spring|summer|fall|winter)\s*(\d{4})").unwrap());

/// Extract course metadata from the source text.
pub fn extract_course_info(source: &SourceDocument) -> CourseInfo {
    let mut info = CourseInfo::default();

    for line in source.lines() {
        let line_lower = line.trim().to_lowercase();

        if info.course_name.is_empty() && contains_any(&line_lower, NAME_LABELS) {
            if let Some(caps) = RE_COURSE_NAME.captures(line) {
                info.course_name = caps[1].trim().to_string();
            }
        }

        if info.course_code.is_empty() {
            if let Some(caps) = RE_COURSE_CODE.captures(line) {
                info.course_code = caps[1].to_uppercase();
            }
        }

        if info.instructor.is_empty() && contains_any(&line_lower, INSTRUCTOR_LABELS) {
            if let Some(caps) = RE_INSTRUCTOR.captures(line) {
                info.instructor = caps[1].trim().to_string();
            }
        }

        if let Some(caps) = RE_SEMESTER.captures(&line_lower) {
            info.semester = capitalize(&caps[1]);
            info.year = caps[2].to_string();
        }
    }

    info
}
