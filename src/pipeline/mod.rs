//! Source-adapter stages: from a user-supplied path or URL to the
//! `(text, tables)` pair the extractors read.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ source ──▶ extract::* ──▶ ParseResult
//! (URL/path)  (pdfium)   (regex rules)
//! ```
//!
//! 1. [`input`]  - canonicalise the path or URL to a local file, checking
//!    size and `%PDF` magic bytes
//! 2. [`source`] - decode page text with pdfium inside `spawn_blocking`;
//!    the only stage that can fail once the file is found
//!
//! Extraction proper lives in [`crate::extract`] and never fails.

pub mod input;
pub mod source;
