//! Reporter trait for per-file conversion events.
//!
//! Inject an [`Arc<dyn ConversionReporter>`] via
//! [`crate::config::RunConfigBuilder::reporter`] to receive events as each
//! job finishes.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a terminal progress bar, a log file, or a channel
//! without the library knowing how the host application communicates. The
//! trait is `Send + Sync` because jobs complete concurrently.
//!
//! Reporting is purely observational — nothing an implementation does can
//! influence which jobs run or how they are scheduled.

use crate::summary::RunSummary;
use std::sync::Arc;

/// Called by the scheduler as each job's result becomes available.
///
/// Jobs finish in arbitrary order under concurrency, so `on_file_*` methods
/// may be called from different threads at overlapping times. Implementations
/// must protect shared mutable state accordingly. All methods default to
/// no-ops so callers only override what they care about.
pub trait ConversionReporter: Send + Sync {
    /// Called once after scanning, before any job is submitted.
    fn on_run_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called when a new output file was written.
    fn on_file_converted(&self, input_name: &str, output_name: &str) {
        let _ = (input_name, output_name);
    }

    /// Called when the output already existed and the file was skipped.
    fn on_file_skipped(&self, input_name: &str) {
        let _ = input_name;
    }

    /// Called when a file failed to render, encode, or write.
    fn on_file_failed(&self, input_name: &str, error: &str) {
        let _ = (input_name, error);
    }

    /// Called once after all jobs have completed.
    fn on_run_complete(&self, summary: &RunSummary) {
        let _ = summary;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopReporter;

impl ConversionReporter for NoopReporter {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type Reporter = Arc<dyn ConversionReporter>;
