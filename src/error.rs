//! Error types for the pdfthumbs library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ThumbsError`] — **Fatal**: the run cannot proceed at all (input
//!   directory missing, output directory cannot be created, invalid
//!   configuration). Returned as `Err(ThumbsError)` from [`crate::run`]
//!   before any job is submitted.
//!
//! * [`JobError`] — **Non-fatal**: a single file failed (corrupt PDF,
//!   encode error, write error) but all other files are fine. Folded into
//!   [`crate::summary::JobResult::Failed`] at the ConversionJob boundary so
//!   one bad file never aborts its siblings.
//!
//! There are no retries anywhere: a failed render or write is reported once
//! per run. Re-running the whole pipeline is the retry mechanism, and it is
//! cheap because outputs that already exist are skipped.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfthumbs library.
///
/// Per-file failures use [`JobError`] and are stored in
/// [`crate::summary::JobResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ThumbsError {
    // ── Setup errors ──────────────────────────────────────────────────────
    /// Input directory was not found at the given path.
    #[error("Input directory not found: '{path}'\nCheck the path exists and is readable.")]
    InputDirMissing { path: PathBuf },

    /// The input path exists but is not a directory.
    #[error("Input path is not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not enumerate the input directory.
    #[error("Failed to read directory '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Flatten errors ────────────────────────────────────────────────────
    /// A file move during the flatten operation failed.
    #[error("Failed to move '{from}' to '{to}': {source}")]
    FlattenFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single input file.
///
/// Caught at the ConversionJob boundary and converted into
/// [`crate::summary::JobResult::Failed`]. The run continues regardless of
/// how many files fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum JobError {
    /// The rendering backend could not produce a bitmap for the page.
    /// Covers corrupt PDFs, out-of-range page indices, and backend errors.
    #[error("Rendering failed for '{path}': {detail}")]
    RenderFailed { path: PathBuf, detail: String },

    /// The rendered bitmap could not be encoded in the requested format.
    #[error("Encoding failed for '{path}': {detail}")]
    EncodeFailed { path: PathBuf, detail: String },

    /// The encoded image could not be written to disk.
    #[error("Failed to write output '{path}': {detail}")]
    WriteFailed { path: PathBuf, detail: String },

    /// The worker running the conversion died before producing a result,
    /// e.g. a panic inside the rendering backend.
    #[error("Conversion task failed for '{path}': {detail}")]
    TaskFailed { path: PathBuf, detail: String },
}
