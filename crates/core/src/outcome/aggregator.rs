use tokio::sync::mpsc;

use super::{OutcomeEvent, OutcomeHandle, OutcomeRecorder, RunSummary, SummaryRecorder};

/// Background task that owns the recorder for a run
///
/// Every [`OutcomeHandle`] funnels into this one task, so the recorder is
/// only ever touched from a single place.
pub struct OutcomeAggregator<R = SummaryRecorder> {
    rx: mpsc::Receiver<OutcomeEvent>,
    recorder: R,
}

impl OutcomeAggregator {
    /// Create a new aggregator backed by a [`SummaryRecorder`]
    pub fn new(rx: mpsc::Receiver<OutcomeEvent>) -> Self {
        Self::with_recorder(rx, SummaryRecorder::new())
    }
}

impl<R: OutcomeRecorder + Send> OutcomeAggregator<R> {
    /// Create an aggregator that feeds `recorder`
    pub fn with_recorder(rx: mpsc::Receiver<OutcomeEvent>, recorder: R) -> Self {
        Self { rx, recorder }
    }

    /// Consume outcomes until every handle is dropped, then return the
    /// final summary
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) -> RunSummary {
        while let Some(event) = self.rx.recv().await {
            self.recorder.record(&event.path, &event.outcome);
        }
        self.recorder.summarize()
    }
}

/// Create a complete outcome recording system
///
/// Returns:
/// - `OutcomeHandle` - clone this into every worker
/// - `OutcomeAggregator` - spawn with `tokio::spawn(aggregator.run())`
///
/// # Arguments
/// * `buffer_size` - Size of the channel buffer (recording waits if full)
pub fn create_outcome_system(buffer_size: usize) -> (OutcomeHandle, OutcomeAggregator) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (OutcomeHandle::new(tx), OutcomeAggregator::new(rx))
}
