//! Run-level outcome accounting.

use serde::Serialize;

use crate::transcoder::FileOutcome;

/// Aggregate counters for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Files visited.
    pub total: u64,
    /// Converted, verified, present at the destination.
    pub converted: u64,
    /// Encoder ran (or failed to run) and produced nothing usable.
    pub failed: u64,
    /// Never handed to the encoder: destination existed or the source
    /// was rejected by the probe.
    pub skipped: u64,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

impl RunSummary {
    /// Folds one file outcome into the counters.
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.total += 1;
        match outcome {
            FileOutcome::Converted => self.converted += 1,
            FileOutcome::SkippedExisting | FileOutcome::SkippedUnusable(_) => self.skipped += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Every visited file lands in exactly one bucket.
    pub fn is_balanced(&self) -> bool {
        self.total == self.converted + self.failed + self.skipped
    }
}
