//! # syllabus-extract
//!
//! Pull structured course data out of syllabus PDFs.
//!
//! ## Why this crate?
//!
//! Syllabi are written for students, not machines: every instructor lays out
//! the course name, deadlines and meeting times differently. This crate reads
//! the text (and any tables) of a syllabus and applies a fixed set of
//! line-oriented rules to recover four things: course information,
//! assignments with due dates, the weekly meeting schedule, and important
//! dates. The rules are heuristics. They never fail on odd input; a field
//! that cannot be found is simply empty.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    resolve local file or download from URL, check %PDF + size
//!  ├─ 2. Source   decode page text via pdfium (spawn_blocking)
//!  ├─ 3. Extract  course / assignments / schedule / dates (independent passes)
//!  └─ 4. Output   ParseResult + metadata + stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use syllabus_extract::{parse_document, ParseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ParseConfig::builder()
//!         .semester_start_date("2024-01-16")
//!         .build()?;
//!     let output = parse_document("syllabus.pdf", &config).await?;
//!     println!("{}", serde_json::to_string_pretty(&output.data)?);
//!     Ok(())
//! }
//! ```
//!
//! Already have the text? Skip the PDF layer entirely:
//!
//! ```rust
//! use syllabus_extract::parse;
//!
//! let result = parse("Instructor: Dr. Smith\nCS 101 Intro\nFall 2024", &[], None);
//! assert_eq!(result.course_info.course_code, "CS 101");
//! assert_eq!(result.course_info.semester, "Fall");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `syllabus` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! syllabus-extract = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod parse;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ParseConfig, ParseConfigBuilder, PageSelection};
pub use error::SyllabusError;
pub use output::{
    Assignment, CourseInfo, DocumentMetadata, ImportantDate, ParseResult, ParseStats, Row,
    ScheduleItem, SyllabusOutput, Table,
};
pub use parse::{
    extract_text, inspect, parse, parse_bytes, parse_concurrent, parse_document,
    parse_document_sync, parse_extracted, parse_source, parse_to_file,
};
pub use pipeline::source::{tables_from_json, SourceDocument};
pub use progress::{NoopProgressCallback, ParseProgressCallback, ProgressCallback};
pub use stream::{parse_batch, parse_stream, DocumentResult, DocumentStream};
