//! Source adapter: turn a PDF into the `(text, tables)` pair the extractors
//! consume.
//!
//! Each selected page's text is appended followed by a single `"\n"`, so page
//! breaks collapse into ordinary line breaks and the extractors never need to
//! know where one page ended. pdfium reports line breaks as `\r\n`; they are
//! normalised to `\n` before anything else sees the text.
//!
//! pdfium exposes characters and their positions, not table structure, so a
//! document decoded here carries no tables. Callers that detect tables
//! elsewhere attach them with [`SourceDocument::with_tables`].
//!
//! ## Why spawn_blocking?
//!
//! pdfium is a C++ library with thread-local state and no async API. Decoding
//! runs on tokio's blocking pool so worker threads never stall on it.

use crate::config::PageSelection;
use crate::error::SyllabusError;
use crate::output::{DocumentMetadata, Table};
use pdfium_render::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// The immutable input record shared by all four extractors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Concatenated page text, one `"\n"` after every non-empty page.
    pub text: String,
    /// Detected tables in document order.
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Pages that were decoded; 0 when the text did not come from a PDF.
    #[serde(default)]
    pub pages: usize,
}

impl SourceDocument {
    /// Wrap already-extracted text (no tables).
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Append tables found by an external detector.
    pub fn with_tables(mut self, tables: Vec<Table>) -> Self {
        self.tables.extend(tables);
        self
    }

    /// Lines of the text, split on `\n` only.
    ///
    /// Unlike [`str::lines`] this keeps a trailing `\r`, so descriptions echo
    /// the source byte for byte.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// Decode tables from JSON shaped as `[[["cell", null, ...], ...], ...]`.
pub fn tables_from_json(json: &str) -> Result<Vec<Table>, SyllabusError> {
    serde_json::from_str(json).map_err(|e| SyllabusError::InvalidTables {
        detail: e.to_string(),
    })
}

/// Bind to a pdfium library.
///
/// Resolution order: `PDFIUM_LIB_PATH`, then a library in the working
/// directory, then the system library search path.
pub fn bind_pdfium() -> Result<Pdfium, SyllabusError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(path) if !path.is_empty() => Pdfium::bind_to_library(&path),
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| SyllabusError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Decode the selected pages of a PDF into a [`SourceDocument`].
pub async fn extract_source(
    pdf_path: &Path,
    password: Option<&str>,
    pages: &PageSelection,
) -> Result<SourceDocument, SyllabusError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(|s| s.to_string());
    let selection = pages.clone();

    tokio::task::spawn_blocking(move || extract_source_blocking(&path, pwd.as_deref(), &selection))
        .await
        .map_err(|e| SyllabusError::Internal(format!("Text extraction task panicked: {}", e)))?
}

/// Blocking implementation of text extraction.
fn extract_source_blocking(
    pdf_path: &Path,
    password: Option<&str>,
    selection: &PageSelection,
) -> Result<SourceDocument, SyllabusError> {
    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| load_error(pdf_path, password, e))?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let indices = selection.to_indices(total_pages);
    if indices.is_empty() && !matches!(selection, PageSelection::All) {
        return Err(SyllabusError::PageOutOfRange {
            page: selection.first_page().unwrap_or(0),
            total: total_pages,
        });
    }

    let mut text = String::new();
    for &idx in &indices {
        let page = pages
            .get(idx as u16)
            .map_err(|e| SyllabusError::SourceUnreadable {
                path: pdf_path.to_path_buf(),
                detail: format!("page {}: {:?}", idx + 1, e),
            })?;

        let page_text = page
            .text()
            .map_err(|e| SyllabusError::SourceUnreadable {
                path: pdf_path.to_path_buf(),
                detail: format!("page {}: {:?}", idx + 1, e),
            })?
            .all();

        debug!("Page {} → {} chars", idx + 1, page_text.chars().count());

        if page_text.is_empty() {
            warn!("Page {} has no text layer; skipped", idx + 1);
        } else {
            text.push_str(&normalise_line_endings(&page_text));
            text.push('\n');
        }
    }

    Ok(SourceDocument {
        text,
        tables: Vec::new(),
        pages: indices.len(),
    })
}

/// Extract document metadata from a PDF without decoding page text.
pub async fn extract_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, SyllabusError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(|s| s.to_string());

    tokio::task::spawn_blocking(move || extract_metadata_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| SyllabusError::Internal(format!("Metadata task panicked: {}", e)))?
}

/// Blocking implementation of metadata extraction.
fn extract_metadata_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, SyllabusError> {
    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| load_error(pdf_path, password, e))?;

    let metadata = document.metadata();
    let pages = document.pages();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: pages.len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}

/// Map a pdfium load failure onto the password or unreadable variants.
fn load_error(pdf_path: &Path, password: Option<&str>, e: PdfiumError) -> SyllabusError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            SyllabusError::WrongPassword {
                path: pdf_path.to_path_buf(),
            }
        } else {
            SyllabusError::PasswordRequired {
                path: pdf_path.to_path_buf(),
            }
        }
    } else {
        SyllabusError::SourceUnreadable {
            path: pdf_path.to_path_buf(),
            detail: err_str,
        }
    }
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}
