//! Input resolution: normalise a user-supplied path or URL to a local PDF.
//!
//! pdfium opens documents by path, so URL inputs are downloaded into a
//! `TempDir` that lives as long as the [`ResolvedInput`]; dropping it removes
//! the file. Every input is checked for the `%PDF` magic bytes and against
//! the configured size limit before pdfium sees it, so callers get a clear
//! error instead of a decoder failure.

use crate::error::SyllabusError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The resolved input: either a local path or a downloaded temp file.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; PDF downloaded to a temp directory.
    /// The `TempDir` is kept alive to prevent cleanup until processing completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Get the path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local PDF file path.
///
/// URLs are downloaded to a temporary directory; local paths are validated
/// in place.
pub async fn resolve_input(
    input: &str,
    timeout_secs: u64,
    max_bytes: u64,
) -> Result<ResolvedInput, SyllabusError> {
    if input.trim().is_empty() {
        return Err(SyllabusError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs, max_bytes).await
    } else {
        resolve_local(input, max_bytes)
    }
}

/// Resolve a local file path, validating existence, size and PDF magic bytes.
fn resolve_local(path_str: &str, max_bytes: u64) -> Result<ResolvedInput, SyllabusError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(SyllabusError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let size = f.metadata().map(|m| m.len()).unwrap_or(0);
            if size > max_bytes {
                return Err(SyllabusError::FileTooLarge {
                    path,
                    size,
                    limit: max_bytes,
                });
            }

            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(SyllabusError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(SyllabusError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(SyllabusError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL to a temporary directory and return the path.
async fn download_url(
    url: &str,
    timeout_secs: u64,
    max_bytes: u64,
) -> Result<ResolvedInput, SyllabusError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SyllabusError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            SyllabusError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            SyllabusError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(SyllabusError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let filename = filename_from_url(url);
    let temp_dir = TempDir::new().map_err(|e| SyllabusError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    if let Some(declared) = response.content_length() {
        if declared > max_bytes {
            return Err(SyllabusError::FileTooLarge {
                path: file_path,
                size: declared,
                limit: max_bytes,
            });
        }
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| SyllabusError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if bytes.len() as u64 > max_bytes {
        return Err(SyllabusError::FileTooLarge {
            path: file_path,
            size: bytes.len() as u64,
            limit: max_bytes,
        });
    }

    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(SyllabusError::NotAPdf {
            path: file_path,
            magic,
        });
    }

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| SyllabusError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Last path segment of the URL when it looks like a file name.
fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "syllabus.pdf".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LIMIT: u64 = 10 * 1024 * 1024;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.edu/cs101.pdf"));
        assert!(is_url("http://example.edu/cs101.pdf"));
        assert!(!is_url("/tmp/cs101.pdf"));
        assert!(!is_url("cs101.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://example.edu/files/syllabus-fall.pdf"),
            "syllabus-fall.pdf"
        );
        assert_eq!(filename_from_url("https://example.edu/download/"), "syllabus.pdf");
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = resolve_input("/definitely/not/here.pdf", 5, LIMIT)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SyllabusError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn empty_input_is_invalid() {
        let err = resolve_input("  ", 5, LIMIT).await.err().unwrap();
        assert!(matches!(err, SyllabusError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn non_pdf_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"Course: Not a PDF").unwrap();
        let err = resolve_input(f.path().to_str().unwrap(), 5, LIMIT)
            .await
            .err()
            .unwrap();
        match err {
            SyllabusError::NotAPdf { magic, .. } => assert_eq!(&magic, b"Cour"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7\n").unwrap();
        f.write_all(&[b' '; 64]).unwrap();
        let err = resolve_input(f.path().to_str().unwrap(), 5, 16)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SyllabusError::FileTooLarge { limit: 16, .. }));
    }

    #[tokio::test]
    async fn pdf_magic_is_accepted() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.4\n%%EOF\n").unwrap();
        let resolved = resolve_input(f.path().to_str().unwrap(), 5, LIMIT)
            .await
            .unwrap();
        assert_eq!(resolved.path(), f.path());
    }
}
