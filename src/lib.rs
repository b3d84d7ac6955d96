//! # pdfthumbs
//!
//! Batch-convert the first page of PDF files into raster images — PNG at
//! full resolution or bounded JPEG thumbnails — skipping files whose output
//! already exists.
//!
//! ## Why this crate?
//!
//! Static sites and portfolios often keep a folder of PDFs (reports,
//! drawings, papers) and need a matching folder of preview images. Doing
//! that by hand, or with a pile of one-off scripts, breaks down the moment
//! file names need sanitising for URLs or the collection grows past a few
//! dozen files. This crate is that pipeline done once, properly: a
//! deterministic namer, a pluggable rendering backend, and a bounded
//! worker pool that makes re-runs cheap via skip-if-exists.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input_dir
//!  │
//!  ├─ 1. Scan     enumerate *.pdf (flat, or one subdirectory level)
//!  ├─ 2. Job      per file: skip if output exists
//!  ├─ 3. Render   first page via pdfium or an external tool (spawn_blocking)
//!  ├─ 4. Resize   fit thumbnail bounding box (aspect preserved)
//!  ├─ 5. Encode   PNG, or JPEG with configurable quality
//!  └─ 6. Report   per-file status + run summary
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfthumbs::{run, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::builder("public/pdfs", "public/images/projects")
//!         .concurrency(4)
//!         .build()?;
//!     let summary = run(&config).await?;
//!     println!(
//!         "{} out of {} files processed successfully",
//!         summary.successful(),
//!         summary.total
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfthumbs` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdfthumbs = { version = "0.3", default-features = false }
//! ```
//!
//! ## Failure semantics
//!
//! A corrupt or unreadable PDF produces exactly one `Failed` result and
//! never aborts sibling jobs. Only setup errors (missing input directory,
//! uncreatable output directory, invalid configuration) abort the run, and
//! they do so before any job is submitted. There are no retries: re-running
//! the pipeline is the retry mechanism, and it is cheap because existing
//! outputs are skipped.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod flatten;
pub mod naming;
pub mod pipeline;
pub mod progress;
pub mod run;
pub mod summary;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    OutputFormat, OutputMode, RenderBackend, Resolution, RunConfig, RunConfigBuilder,
};
pub use error::{JobError, ThumbsError};
pub use flatten::{flatten, MovedFile};
pub use naming::{derive_name, sanitize_stem};
pub use pipeline::render::{CommandRenderer, PageRenderer, PdfiumRenderer};
pub use pipeline::scan::InputFile;
pub use progress::{ConversionReporter, NoopReporter, Reporter};
pub use run::{run, run_sync, run_with_renderer};
pub use summary::{JobOutcome, JobResult, RunSummary};
