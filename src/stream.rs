//! Batch parsing: many syllabi, results emitted as each document finishes.
//!
//! A department uploading a semester's worth of syllabi should not wait for
//! the slowest download before seeing the first result. [`parse_stream`]
//! keeps up to [`ParseConfig::concurrency`] documents in flight and yields a
//! [`DocumentResult`] per input in completion order. One unreadable document
//! produces an `Err` item; the rest of the batch carries on.
//!
//! [`parse_batch`] drains the stream and returns results in input order.

use crate::config::ParseConfig;
use crate::error::SyllabusError;
use crate::output::SyllabusOutput;
use crate::parse::parse_document;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::{info, warn};

/// Outcome for one input of a batch.
#[derive(Debug)]
pub struct DocumentResult {
    /// 0-indexed position of the input in the batch.
    pub index: usize,
    /// The path or URL as given.
    pub input: String,
    pub result: Result<SyllabusOutput, SyllabusError>,
}

/// A boxed stream of per-document results.
pub type DocumentStream = Pin<Box<dyn Stream<Item = DocumentResult> + Send>>;

/// Parse several syllabi concurrently, yielding results as they complete.
///
/// # Example
/// ```rust,no_run
/// use syllabus_extract::{parse_stream, ParseConfig};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = ParseConfig::default();
/// let mut results = parse_stream(["cs101.pdf", "math221.pdf"], &config);
/// while let Some(doc) = results.next().await {
///     match doc.result {
///         Ok(out) => println!("{}: {} assignments", doc.input, out.data.assignments.len()),
///         Err(e) => eprintln!("{}: {e}", doc.input),
///     }
/// }
/// # }
/// ```
pub fn parse_stream<I, S>(inputs: I, config: &ParseConfig) -> DocumentStream
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let inputs: Vec<String> = inputs.into_iter().map(Into::into).collect();
    let total = inputs.len();
    let concurrency = config.concurrency;
    let config = config.clone();
    info!("Starting batch of {} documents ({} at a time)", total, concurrency);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let s = stream::iter(inputs.into_iter().enumerate().map(move |(index, input)| {
        let cfg = config.clone();
        async move {
            if let Some(ref cb) = cfg.progress_callback {
                cb.on_document_start(index, total, &input);
            }
            let result = parse_document(&input, &cfg).await;
            match &result {
                Ok(out) => {
                    if let Some(ref cb) = cfg.progress_callback {
                        cb.on_document_complete(index, total, &out.stats);
                    }
                }
                Err(e) => {
                    warn!("Failed to parse '{}': {}", input, e);
                    if let Some(ref cb) = cfg.progress_callback {
                        cb.on_document_error(index, total, &e.to_string());
                    }
                }
            }
            DocumentResult {
                index,
                input,
                result,
            }
        }
    }))
    .buffer_unordered(concurrency);

    Box::pin(s)
}

/// Parse several syllabi and return every result in input order.
pub async fn parse_batch<I, S>(inputs: I, config: &ParseConfig) -> Vec<DocumentResult>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut results: Vec<DocumentResult> = parse_stream(inputs, config).collect().await;
    results.sort_by_key(|r| r.index);

    let ok = results.iter().filter(|r| r.result.is_ok()).count();
    info!("Batch complete: {}/{} documents parsed", ok, results.len());
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(results.len(), ok);
    }

    results
}
