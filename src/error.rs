//! Error types for the syllabus-extract library.
//!
//! Only one failure mode is fatal: the document cannot be turned into text
//! (missing file, not a PDF, corrupt or encrypted document, bad download).
//! Those surface as [`SyllabusError`] from the document-level entry points and
//! no partial result is returned.
//!
//! Extraction itself never fails. A syllabus with no assignments is not an
//! error: the collection is simply empty. That is why the in-memory
//! [`crate::parse::parse`] function returns a plain
//! [`crate::output::ParseResult`] rather than a `Result`.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the syllabus-extract library.
#[derive(Debug, Error)]
pub enum SyllabusError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The file is larger than the configured upload limit.
    #[error("File '{path}' is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The document could not be decoded into text at all.
    #[error("Error reading PDF file '{path}': {detail}")]
    SourceUnreadable { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The page selection does not cover any page of the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    // ── Caller-supplied data ──────────────────────────────────────────────
    /// Semester start date is not a calendar date in `YYYY-MM-DD` form.
    #[error("Invalid semester start date '{value}'. Use YYYY-MM-DD")]
    InvalidSemesterStart { value: String },

    /// Caller-supplied table JSON could not be decoded.
    #[error("Invalid table data: {detail}")]
    InvalidTables { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the binary, install it system-wide, or\n\
set PDFIUM_LIB_PATH=/path/to/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_unreadable_display() {
        let e = SyllabusError::SourceUnreadable {
            path: PathBuf::from("/tmp/broken.pdf"),
            detail: "xref table missing".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("broken.pdf"), "got: {msg}");
        assert!(msg.contains("xref table missing"), "got: {msg}");
    }

    #[test]
    fn file_too_large_display() {
        let e = SyllabusError::FileTooLarge {
            path: PathBuf::from("big.pdf"),
            size: 11_000_000,
            limit: 10_485_760,
        };
        let msg = e.to_string();
        assert!(msg.contains("11000000"), "got: {msg}");
        assert!(msg.contains("10485760"), "got: {msg}");
    }

    #[test]
    fn invalid_semester_start_display() {
        let e = SyllabusError::InvalidSemesterStart {
            value: "01/15/2024".into(),
        };
        assert!(e.to_string().contains("YYYY-MM-DD"));
        assert!(e.to_string().contains("01/15/2024"));
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = SyllabusError::OutputWriteFailed {
            path: PathBuf::from("out.json"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("disk full"));
    }
}
