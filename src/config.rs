//! Configuration types for syllabus parsing.
//!
//! All document-level behaviour is controlled through [`ParseConfig`], built
//! via its [`ParseConfigBuilder`]. The extractors themselves take no
//! configuration: given the same text and tables they always produce the same
//! records. The knobs here govern the source adapter (which pages, how big a
//! file, how long a download may take) and how the work is scheduled.

use crate::error::SyllabusError;
use crate::progress::ProgressCallback;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Default number of characters echoed back in `ParseResult::raw_text`.
pub const DEFAULT_RAW_TEXT_LIMIT: usize = 1000;

/// Configuration for parsing one or more syllabus documents.
///
/// # Example
/// ```rust
/// use syllabus_extract::ParseConfig;
///
/// let config = ParseConfig::builder()
///     .semester_start_date("2024-01-16")
///     .concurrency(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.semester_start_date.as_deref(), Some("2024-01-16"));
/// ```
#[derive(Clone)]
pub struct ParseConfig {
    /// First day of the semester, `YYYY-MM-DD`. Default: None.
    ///
    /// Echoed in [`crate::output::SyllabusOutput`]; extraction does not
    /// consult it.
    pub semester_start_date: Option<String>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Pages whose text is fed to the extractors. Default: all pages.
    pub pages: PageSelection,

    /// Largest accepted input in bytes. Default: 10 MiB.
    pub max_file_bytes: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Characters of source text kept in `raw_text`. Default: 1000.
    pub raw_text_limit: usize,

    /// Run the four extractors on separate blocking tasks. Default: true.
    ///
    /// Output is identical either way.
    pub concurrent_extractors: bool,

    /// Documents parsed at once by [`crate::stream::parse_stream`]. Default: 4.
    pub concurrency: usize,

    /// Optional per-document progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            semester_start_date: None,
            password: None,
            pages: PageSelection::default(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            download_timeout_secs: 120,
            raw_text_limit: DEFAULT_RAW_TEXT_LIMIT,
            concurrent_extractors: true,
            concurrency: 4,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ParseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseConfig")
            .field("semester_start_date", &self.semester_start_date)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pages", &self.pages)
            .field("max_file_bytes", &self.max_file_bytes)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("raw_text_limit", &self.raw_text_limit)
            .field("concurrent_extractors", &self.concurrent_extractors)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ParseProgressCallback>"),
            )
            .finish()
    }
}

impl ParseConfig {
    /// Create a new builder for `ParseConfig`.
    pub fn builder() -> ParseConfigBuilder {
        ParseConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ParseConfig`].
#[derive(Debug)]
pub struct ParseConfigBuilder {
    config: ParseConfig,
}

impl ParseConfigBuilder {
    pub fn semester_start_date(mut self, date: impl Into<String>) -> Self {
        self.config.semester_start_date = Some(date.into());
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_bytes = bytes;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn raw_text_limit(mut self, chars: usize) -> Self {
        self.config.raw_text_limit = chars;
        self
    }

    pub fn concurrent_extractors(mut self, v: bool) -> Self {
        self.config.concurrent_extractors = v;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ParseConfig, SyllabusError> {
        let c = &self.config;
        if let Some(ref date) = c.semester_start_date {
            validate_semester_start(date)?;
        }
        if c.raw_text_limit == 0 {
            return Err(SyllabusError::InvalidConfig(
                "raw_text_limit must be ≥ 1".into(),
            ));
        }
        if c.max_file_bytes == 0 {
            return Err(SyllabusError::InvalidConfig(
                "max_file_bytes must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Check that `date` is a real calendar date written as `YYYY-MM-DD`.
pub fn validate_semester_start(date: &str) -> Result<NaiveDate, SyllabusError> {
    let well_formed = date.len() == 10
        && date
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });

    let parsed = if well_formed {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    } else {
        None
    };

    parsed.ok_or_else(|| SyllabusError::InvalidSemesterStart {
        value: date.to_string(),
    })
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF contribute text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// All pages (default).
    #[default]
    All,
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Lowest requested 1-indexed page, used in out-of-range errors.
    pub fn first_page(&self) -> Option<usize> {
        match self {
            PageSelection::All => None,
            PageSelection::Single(p) => Some(*p),
            PageSelection::Range(start, _) => Some(*start),
            PageSelection::Set(pages) => pages.iter().min().copied(),
        }
    }
}
