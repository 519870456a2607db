use std::path::Path;

use super::{ConversionOutcome, RunSummary};

/// Accumulates per-file outcomes into a [`RunSummary`].
pub trait OutcomeRecorder {
    /// Counts one outcome for `path`.
    fn record(&mut self, path: &Path, outcome: &ConversionOutcome);

    /// Snapshot of everything recorded so far.
    fn summarize(&self) -> RunSummary;
}

/// Owned, single-threaded recorder.
///
/// Behind an [`OutcomeAggregator`](super::OutcomeAggregator) it becomes the
/// only writer for a concurrent run.
#[derive(Debug, Default)]
pub struct SummaryRecorder {
    summary: RunSummary,
}

impl SummaryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_summary(self) -> RunSummary {
        self.summary
    }
}

impl OutcomeRecorder for SummaryRecorder {
    fn record(&mut self, path: &Path, outcome: &ConversionOutcome) {
        self.summary.record(path, outcome);
    }

    fn summarize(&self) -> RunSummary {
        self.summary.clone()
    }
}
