//! Per-file outcomes and the end-of-run summary.
//!
//! A [`JobResult`] is produced exactly once per input file and consumed only
//! by reporting — nothing here is persisted. The filesystem itself (the
//! existence of an output file) is the only durable state between runs.

use crate::error::JobError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The tagged outcome of one conversion job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JobResult {
    /// A new output file was written.
    Converted { output: PathBuf },
    /// The output already existed; nothing was rendered or overwritten.
    SkippedExists { output: PathBuf },
    /// Rendering, encoding, or writing failed for this file.
    Failed { error: JobError },
}

impl JobResult {
    pub fn is_converted(&self) -> bool {
        matches!(self, JobResult::Converted { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, JobResult::SkippedExists { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, JobResult::Failed { .. })
    }
}

/// One input file paired with its result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    /// Path of the source PDF.
    pub input: PathBuf,
    /// What happened to it.
    pub result: JobResult,
}

/// Aggregate counts for a whole run.
///
/// `converted + skipped + failed == total` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files for which a new output was written.
    pub converted: usize,
    /// Files whose output already existed.
    pub skipped: usize,
    /// Files that failed to render, encode, or write.
    pub failed: usize,
    /// Total input files discovered.
    pub total: usize,
    /// Wall-clock duration of the whole run in milliseconds.
    pub duration_ms: u64,
}

impl RunSummary {
    /// Fold a list of outcomes into counts.
    pub fn from_outcomes(outcomes: &[JobOutcome], duration_ms: u64) -> Self {
        let mut summary = RunSummary {
            total: outcomes.len(),
            duration_ms,
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome.result {
                JobResult::Converted { .. } => summary.converted += 1,
                JobResult::SkippedExists { .. } => summary.skipped += 1,
                JobResult::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Files that did not fail: converted plus skipped.
    pub fn successful(&self) -> usize {
        self.converted + self.skipped
    }
}
