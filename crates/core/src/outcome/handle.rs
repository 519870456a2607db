use std::path::PathBuf;
use tokio::sync::mpsc;

use super::ConversionOutcome;

/// One recorded outcome on its way to the aggregator.
#[derive(Debug, Clone)]
pub struct OutcomeEvent {
    pub path: PathBuf,
    pub outcome: ConversionOutcome,
}

/// Handle for recording per-file outcomes
///
/// This is cheaply cloneable and can be shared across worker tasks.
/// Outcomes are sent through a channel to the single [`OutcomeAggregator`],
/// so counts are never updated concurrently.
///
/// [`OutcomeAggregator`]: super::OutcomeAggregator
#[derive(Clone)]
pub struct OutcomeHandle {
    tx: mpsc::Sender<OutcomeEvent>,
}

impl OutcomeHandle {
    /// Create a new outcome handle from a channel sender
    pub fn new(tx: mpsc::Sender<OutcomeEvent>) -> Self {
        Self { tx }
    }

    /// Record an outcome
    ///
    /// Waits for channel capacity. If the aggregator is gone the error is
    /// logged; the caller is not failed.
    pub async fn record(&self, path: impl Into<PathBuf>, outcome: ConversionOutcome) {
        let event = OutcomeEvent {
            path: path.into(),
            outcome,
        };
        if let Err(e) = self.tx.send(event).await {
            tracing::error!("Failed to record outcome for {}: {}", e.0.path.display(), e);
        }
    }
}
