//! Extraction orchestrator and document-level entry points.
//!
//! [`parse`] is the core: given text and tables it runs the four extractors
//! and assembles a [`ParseResult`]. It cannot fail. [`parse_concurrent`]
//! produces the identical result with each extractor on its own blocking
//! task.
//!
//! The `parse_document*` family wraps the core with the source adapter:
//! resolve the input, decode it with pdfium, extract, and report metadata and
//! timings. Any decoding failure aborts the whole document; there is no
//! partial result.

use crate::config::ParseConfig;
use crate::error::SyllabusError;
use crate::extract::patterns::truncate_chars;
use crate::extract::{
    extract_assignments, extract_course_info, extract_important_dates, extract_schedule,
};
use crate::output::{DocumentMetadata, ParseResult, ParseStats, SyllabusOutput, Table};
use crate::pipeline::input;
use crate::pipeline::source::{self, SourceDocument};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Run all four extractors over `text` and `tables`.
///
/// `semester_start_date` is accepted for context only; no extractor reads it.
///
/// # Example
/// ```rust
/// use syllabus_extract::parse;
///
/// let result = parse("Assignment #2 due: 01/22/2024", &[], None);
/// assert_eq!(result.assignments[0].title, "Assignment 2");
/// assert_eq!(result.assignments[0].due_date, "01/22/2024");
/// ```
pub fn parse(text: &str, tables: &[Table], semester_start_date: Option<&str>) -> ParseResult {
    let source = SourceDocument::from_text(text).with_tables(tables.to_vec());
    parse_source(&source, semester_start_date, crate::config::DEFAULT_RAW_TEXT_LIMIT)
}

/// Run all four extractors sequentially over a [`SourceDocument`].
pub fn parse_source(
    source: &SourceDocument,
    semester_start_date: Option<&str>,
    raw_text_limit: usize,
) -> ParseResult {
    debug!(
        semester_start_date = semester_start_date.unwrap_or(""),
        "Extracting from {} chars, {} tables",
        source.text.len(),
        source.tables.len()
    );
    let result = ParseResult {
        course_info: extract_course_info(source),
        assignments: extract_assignments(source),
        schedule: extract_schedule(source),
        important_dates: extract_important_dates(source),
        raw_text: raw_text_preview(&source.text, raw_text_limit),
    };
    log_counts(&result);
    result
}

/// Run the four extractors on separate blocking tasks and join them.
///
/// Output is identical to [`parse_source`]; the extractors share the source
/// read-only through an `Arc`.
pub async fn parse_concurrent(
    source: Arc<SourceDocument>,
    semester_start_date: Option<&str>,
    raw_text_limit: usize,
) -> Result<ParseResult, SyllabusError> {
    debug!(
        semester_start_date = semester_start_date.unwrap_or(""),
        "Extracting concurrently from {} chars, {} tables",
        source.text.len(),
        source.tables.len()
    );

    let (s1, s2, s3, s4) = (
        Arc::clone(&source),
        Arc::clone(&source),
        Arc::clone(&source),
        Arc::clone(&source),
    );
    let (course_info, assignments, schedule, important_dates) = tokio::try_join!(
        tokio::task::spawn_blocking(move || extract_course_info(&s1)),
        tokio::task::spawn_blocking(move || extract_assignments(&s2)),
        tokio::task::spawn_blocking(move || extract_schedule(&s3)),
        tokio::task::spawn_blocking(move || extract_important_dates(&s4)),
    )
    .map_err(|e| SyllabusError::Internal(format!("Extractor task panicked: {}", e)))?;

    let result = ParseResult {
        course_info,
        assignments,
        schedule,
        important_dates,
        raw_text: raw_text_preview(&source.text, raw_text_limit),
    };
    log_counts(&result);
    Ok(result)
}

/// First `limit` characters of `text`, with `...` appended when cut.
pub fn raw_text_preview(text: &str, limit: usize) -> String {
    truncate_chars(text, limit)
}

fn log_counts(result: &ParseResult) {
    debug!(
        "Extracted {} assignments, {} schedule items, {} important dates",
        result.assignments.len(),
        result.schedule.len(),
        result.important_dates.len()
    );
}

/// Parse a syllabus PDF from a local path or HTTP/HTTPS URL.
///
/// # Errors
/// Returns `Err(SyllabusError)` only when the document cannot be read:
/// missing file, not a PDF, too large, encrypted, or undecodable.
pub async fn parse_document(
    input_str: impl AsRef<str>,
    config: &ParseConfig,
) -> Result<SyllabusOutput, SyllabusError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Parsing syllabus: {}", input_str);

    let resolved =
        input::resolve_input(input_str, config.download_timeout_secs, config.max_file_bytes)
            .await?;
    let pdf_path = resolved.path().to_path_buf();

    let metadata = source::extract_metadata(&pdf_path, config.password.as_deref()).await?;
    let document =
        source::extract_source(&pdf_path, config.password.as_deref(), &config.pages).await?;

    let mut output = parse_extracted(document, metadata, config).await?;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Parsed '{}': {} assignments, {} schedule items, {} important dates in {}ms",
        input_str,
        output.stats.assignments,
        output.stats.schedule_items,
        output.stats.important_dates,
        output.stats.total_duration_ms
    );

    Ok(output)
}

/// Run the extractors over an already-decoded source and wrap the result.
///
/// This is the entry point for callers with their own text/table source
/// (another PDF library, OCR output, a plain-text syllabus).
pub async fn parse_extracted(
    document: SourceDocument,
    metadata: DocumentMetadata,
    config: &ParseConfig,
) -> Result<SyllabusOutput, SyllabusError> {
    let start = Instant::now();
    let semester_start = config.semester_start_date.as_deref();

    let document = Arc::new(document);
    let data = if config.concurrent_extractors {
        parse_concurrent(Arc::clone(&document), semester_start, config.raw_text_limit).await?
    } else {
        parse_source(&document, semester_start, config.raw_text_limit)
    };
    let extract_duration_ms = start.elapsed().as_millis() as u64;

    let stats = ParseStats {
        pages: document.pages,
        text_chars: document.text.chars().count(),
        tables: document.tables.len(),
        assignments: data.assignments.len(),
        schedule_items: data.schedule.len(),
        important_dates: data.important_dates.len(),
        extract_duration_ms,
        total_duration_ms: extract_duration_ms,
    };

    Ok(SyllabusOutput {
        data,
        semester_start_date: config.semester_start_date.clone(),
        metadata,
        stats,
    })
}

/// Decode a syllabus PDF and return its text without running the extractors.
pub async fn extract_text(
    input_str: impl AsRef<str>,
    config: &ParseConfig,
) -> Result<SourceDocument, SyllabusError> {
    let resolved = input::resolve_input(
        input_str.as_ref(),
        config.download_timeout_secs,
        config.max_file_bytes,
    )
    .await?;
    source::extract_source(resolved.path(), config.password.as_deref(), &config.pages).await
}

/// Extract PDF metadata without decoding page text.
pub async fn inspect(input_str: impl AsRef<str>) -> Result<DocumentMetadata, SyllabusError> {
    let config = ParseConfig::default();
    let resolved = input::resolve_input(
        input_str.as_ref(),
        config.download_timeout_secs,
        config.max_file_bytes,
    )
    .await?;
    source::extract_metadata(resolved.path(), None).await
}

/// Parse a syllabus and write the [`SyllabusOutput`] as pretty JSON.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn parse_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ParseConfig,
) -> Result<ParseStats, SyllabusError> {
    let output = parse_document(input_str, config).await?;
    let path = output_path.as_ref();

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| SyllabusError::Internal(format!("Failed to serialise output: {e}")))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SyllabusError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json)
        .await
        .map_err(|e| SyllabusError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| SyllabusError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`parse_document`].
///
/// Creates a temporary tokio runtime internally.
pub fn parse_document_sync(
    input_str: impl AsRef<str>,
    config: &ParseConfig,
) -> Result<SyllabusOutput, SyllabusError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SyllabusError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(parse_document(input_str, config))
}

/// Parse PDF bytes held in memory, e.g. an uploaded file.
///
/// The bytes are written to a managed [`tempfile`] that is removed on return.
pub async fn parse_bytes(
    bytes: &[u8],
    config: &ParseConfig,
) -> Result<SyllabusOutput, SyllabusError> {
    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| SyllabusError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| SyllabusError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) when `parse_document` returns
    parse_document(&path, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_text_is_truncated_past_the_limit() {
        let long = "a".repeat(1500);
        let preview = raw_text_preview(&long, 1000);
        assert_eq!(preview.chars().count(), 1003);
        assert!(preview.ends_with("..."));

        let short = "b".repeat(500);
        assert_eq!(raw_text_preview(&short, 1000), short);

        let exact = "c".repeat(1000);
        assert_eq!(raw_text_preview(&exact, 1000), exact);
    }

    #[test]
    fn parse_assembles_all_four_collections() {
        let text = "Course: Data Structures\n\
                    Instructor: Dr. Smith\n\
                    CS 201 Spring 2024\n\
                    Monday 9:00 AM Room 101\n\
                    Homework 1 due: 01/29/2024\n\
                    Midterm Exam: 02/15/2024\n";
        let r = parse(text, &[], Some("2024-01-16"));

        assert_eq!(r.course_info.course_name, "Data Structures");
        assert_eq!(r.course_info.instructor, "Dr. Smith");
        assert_eq!(r.course_info.course_code, "CS 201");
        assert_eq!(r.course_info.semester, "Spring");
        assert_eq!(r.course_info.year, "2024");

        assert_eq!(r.schedule.len(), 1);
        assert_eq!(r.schedule[0].location, "101");

        // "Exam:" is not followed by a number, so only the homework counts.
        let titles: Vec<&str> = r.assignments.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Homework 1"]);

        assert_eq!(r.important_dates.len(), 2);
        assert_eq!(r.important_dates[0].date, "01/29/2024");
        assert_eq!(r.important_dates[1].date, "02/15/2024");

        assert_eq!(r.raw_text, text);
    }

    #[test]
    fn semester_start_does_not_change_extraction() {
        let text = "Quiz 1 due: 02/02/2024\nFriday 1PM";
        assert_eq!(parse(text, &[], None), parse(text, &[], Some("2024-01-08")));
    }

    #[tokio::test]
    async fn concurrent_matches_sequential() {
        let text = "Lab 1 on Tuesday 2:00 PM HSS 101\nFinal exam December 12, 2024\nFall 2024";
        let tables: Vec<Table> = vec![vec![vec![
            Some("Project 2".into()),
            Some("Thursday".into()),
            Some("3/14/2024".into()),
        ]]];
        let source = SourceDocument::from_text(text).with_tables(tables);

        let sequential = parse_source(&source, None, 1000);
        let concurrent = parse_concurrent(Arc::new(source), None, 1000).await.unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn parse_extracted_fills_stats_and_echoes_start_date() {
        let config = ParseConfig::builder()
            .semester_start_date("2024-01-16")
            .build()
            .unwrap();
        let doc = SourceDocument::from_text("Assignment 1\nAssignment 2\nMonday\n");
        let out = parse_extracted(doc, DocumentMetadata::default(), &config)
            .await
            .unwrap();

        assert_eq!(out.semester_start_date.as_deref(), Some("2024-01-16"));
        assert_eq!(out.stats.assignments, 2);
        assert_eq!(out.stats.schedule_items, 1);
        assert_eq!(out.stats.text_chars, 33);
        assert_eq!(out.stats.tables, 0);
    }

    #[tokio::test]
    async fn parse_bytes_rejects_non_pdf_before_decoding() {
        let err = parse_bytes(b"hello", &ParseConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SyllabusError::NotAPdf { .. }));
    }
}
