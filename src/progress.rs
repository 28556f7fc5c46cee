//! Progress-callback trait for batch parsing events.
//!
//! Inject an [`Arc<dyn ParseProgressCallback>`] via
//! [`crate::config::ParseConfigBuilder::progress_callback`] to be told when
//! each document of a [`crate::stream::parse_stream`] batch starts, finishes
//! or fails. The single-document entry points in [`crate::parse`] do not
//! report progress.
//!
//! # Example
//!
//! ```rust
//! use syllabus_extract::{ParseConfig, ParseProgressCallback, ParseStats};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     parsed: AtomicUsize,
//! }
//!
//! impl ParseProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, index: usize, total: usize, stats: &ParseStats) {
//!         self.parsed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{}: {} assignments", index + 1, total, stats.assignments);
//!     }
//! }
//!
//! let config = ParseConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { parsed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::ParseStats;
use std::sync::Arc;

/// Called by the document pipeline as it works through its inputs.
///
/// Implementations must be `Send + Sync`: in a batch, several documents are
/// in flight at once and events arrive from different tasks in completion
/// order. All methods default to no-ops.
pub trait ParseProgressCallback: Send + Sync {
    /// Called once before any document is opened.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called just before a document is resolved and decoded.
    ///
    /// # Arguments
    /// * `index` - 0-indexed position of the input in the batch
    /// * `total` - number of inputs in the batch
    /// * `input` - the path or URL as given
    fn on_document_start(&self, index: usize, total: usize, input: &str) {
        let _ = (index, total, input);
    }

    /// Called when a document was parsed.
    fn on_document_complete(&self, index: usize, total: usize, stats: &ParseStats) {
        let _ = (index, total, stats);
    }

    /// Called when a document could not be read.
    fn on_document_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called once after every input has been attempted.
    fn on_batch_complete(&self, total: usize, success_count: usize) {
        let _ = (total, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ParseProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ParseConfig`].
pub type ProgressCallback = Arc<dyn ParseProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        assignments_seen: AtomicUsize,
        succeeded: AtomicUsize,
    }

    impl ParseProgressCallback for TrackingCallback {
        fn on_document_start(&self, _index: usize, _total: usize, _input: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_complete(&self, _index: usize, _total: usize, stats: &ParseStats) {
            self.completes.fetch_add(1, Ordering::SeqCst);
            self.assignments_seen
                .fetch_add(stats.assignments, Ordering::SeqCst);
        }

        fn on_document_error(&self, _index: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_batch_complete(&self, _total: usize, success_count: usize) {
            self.succeeded.store(success_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_document_start(0, 2, "a.pdf");
        cb.on_document_complete(0, 2, &ParseStats::default());
        cb.on_document_error(1, 2, "not a pdf");
        cb.on_batch_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        let stats = ParseStats {
            assignments: 4,
            ..ParseStats::default()
        };

        tracker.on_document_start(0, 3, "a.pdf");
        tracker.on_document_complete(0, 3, &stats);
        tracker.on_document_start(1, 3, "b.pdf");
        tracker.on_document_complete(1, 3, &stats);
        tracker.on_document_start(2, 3, "c.txt");
        tracker.on_document_error(2, 3, "File is not a valid PDF");
        tracker.on_batch_complete(3, 2);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.assignments_seen.load(Ordering::SeqCst), 8);
        assert_eq!(tracker.succeeded.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_batch_start(1);
        cb.on_document_start(0, 1, "syllabus.pdf");
    }
}
