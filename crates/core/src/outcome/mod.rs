//! Per-file outcomes and the run summary.
//!
//! An [`OutcomeRecorder`] turns outcomes into a [`RunSummary`]. Workers
//! record through a cloneable [`OutcomeHandle`]; a single
//! [`OutcomeAggregator`] task owns the recorder and hands back its summary
//! once every handle is dropped.

mod aggregator;
mod handle;
mod recorder;
mod types;

pub use aggregator::{create_outcome_system, OutcomeAggregator};
pub use handle::{OutcomeEvent, OutcomeHandle};
pub use recorder::{OutcomeRecorder, SummaryRecorder};
pub use types::{ConversionOutcome, FailedFile, FailureReason, RunSummary};
