//! The scheduler: enumerate inputs, fan out one job per file over a bounded
//! worker pool, aggregate the results.
//!
//! ## Concurrency model
//!
//! Jobs are fully independent — no shared mutable state beyond the
//! filesystem, no ordering dependency. Fan-out uses
//! `stream::iter(..).buffer_unordered(concurrency)` over `spawn_blocking`
//! tasks: at most `concurrency` conversions are in flight at once, each on
//! a blocking-pool thread (both rendering backends block). The run is
//! synchronous as a whole; there is no partial-result streaming and no
//! cancellation once a job is submitted.

use crate::config::{RenderBackend, RunConfig};
use crate::error::{JobError, ThumbsError};
use crate::pipeline::render::{CommandRenderer, PageRenderer, PdfiumRenderer};
use crate::pipeline::{job, scan};
use crate::summary::{JobOutcome, JobResult, RunSummary};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Run a batch conversion with the backend named in the config.
///
/// # Errors
/// Returns `Err(ThumbsError)` only for setup failures — missing input
/// directory, output directory that cannot be created, unreadable input
/// directory — all detected before any job is submitted. Per-file failures
/// are counted in the returned [`RunSummary`], never propagated.
pub async fn run(config: &RunConfig) -> Result<RunSummary, ThumbsError> {
    let renderer: Arc<dyn PageRenderer> = match &config.backend {
        RenderBackend::Pdfium => Arc::new(PdfiumRenderer),
        RenderBackend::External { program } => Arc::new(CommandRenderer::new(program.clone())),
    };
    run_with_renderer(config, renderer).await
}

/// Run a batch conversion with an injected rendering backend.
///
/// This is the seam the CLI and tests share: any [`PageRenderer`] works,
/// including stubs that never touch a real PDF.
pub async fn run_with_renderer(
    config: &RunConfig,
    renderer: Arc<dyn PageRenderer>,
) -> Result<RunSummary, ThumbsError> {
    let start = Instant::now();

    // ── Setup: fail fast before scheduling any work ──────────────────────
    if !config.input_dir.exists() {
        return Err(ThumbsError::InputDirMissing {
            path: config.input_dir.clone(),
        });
    }
    if !config.input_dir.is_dir() {
        return Err(ThumbsError::NotADirectory {
            path: config.input_dir.clone(),
        });
    }
    std::fs::create_dir_all(&config.output_dir).map_err(|source| {
        ThumbsError::OutputDirCreateFailed {
            path: config.output_dir.clone(),
            source,
        }
    })?;

    // ── Scan ─────────────────────────────────────────────────────────────
    let files = scan::enumerate_pdfs(&config.input_dir, config.subdirectory_mode)?;
    info!(
        "Found {} PDF files under {}",
        files.len(),
        config.input_dir.display()
    );

    if let Some(ref reporter) = config.reporter {
        reporter.on_run_start(files.len());
    }

    // ── Fan out ──────────────────────────────────────────────────────────
    let outcomes: Vec<JobOutcome> = stream::iter(files.into_iter().map(|file| {
        let renderer = Arc::clone(&renderer);
        let config = config.clone();
        async move {
            let input_path = file.path.clone();
            let input_name = file.file_name();

            let outcome =
                tokio::task::spawn_blocking(move || job::convert_one(&file, &*renderer, &config))
                    .await
                    .unwrap_or_else(|e| JobOutcome {
                        input: input_path.clone(),
                        result: JobResult::Failed {
                            error: JobError::TaskFailed {
                                path: input_path,
                                detail: format!("worker panicked: {e}"),
                            },
                        },
                    });

            (input_name, outcome)
        }
    }))
    .buffer_unordered(config.concurrency)
    .map(|(input_name, outcome)| {
        if let Some(ref reporter) = config.reporter {
            match &outcome.result {
                JobResult::Converted { output } => reporter.on_file_converted(
                    &input_name,
                    &output
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                ),
                JobResult::SkippedExists { .. } => reporter.on_file_skipped(&input_name),
                JobResult::Failed { error } => {
                    reporter.on_file_failed(&input_name, &error.to_string())
                }
            }
        }
        outcome
    })
    .collect()
    .await;

    // ── Aggregate ────────────────────────────────────────────────────────
    let summary = RunSummary::from_outcomes(&outcomes, start.elapsed().as_millis() as u64);

    if summary.failed > 0 {
        warn!("{} of {} files failed", summary.failed, summary.total);
    }
    info!(
        "Run complete: {} converted, {} skipped, {} failed ({} total) in {}ms",
        summary.converted, summary.skipped, summary.failed, summary.total, summary.duration_ms
    );

    if let Some(ref reporter) = config.reporter {
        reporter.on_run_complete(&summary);
    }

    Ok(summary)
}

/// Synchronous wrapper around [`run`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(config: &RunConfig) -> Result<RunSummary, ThumbsError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ThumbsError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(run(config))
}
