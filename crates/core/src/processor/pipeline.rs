//! Tree walker implementation.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::converter::{probe, transcode, MediaTools, TranscodeError};
use crate::outcome::{create_outcome_system, ConversionOutcome, FailureReason, RunSummary};
use crate::planner::{decide, CandidateFile, ConversionDecision};

use super::config::ProcessorConfig;
use super::discovery::spawn_discovery;
use super::error::ProcessorError;
use super::locks::TargetLocks;

/// Walks a tree and converts every ALAC candidate it finds.
///
/// With `max_parallel_conversions == 1` each file is fully processed before
/// the next one starts. Larger values run that many files at once; outcomes
/// are funneled to a single aggregator and files sharing a target path are
/// serialized.
pub struct TreeProcessor<T: MediaTools> {
    config: ProcessorConfig,
    tools: Arc<T>,
}

impl<T: MediaTools + 'static> TreeProcessor<T> {
    /// Creates a new processor.
    pub fn new(config: ProcessorConfig, tools: T) -> Self {
        Self {
            config,
            tools: Arc::new(tools),
        }
    }

    /// Processes every candidate under `root`.
    ///
    /// Returns the run summary, or a fatal error. On a fatal error no further
    /// file is started, files already in flight are finished, and no summary
    /// is produced.
    pub async fn run(&self, root: &Path) -> Result<RunSummary, ProcessorError> {
        if !root.is_dir() {
            return Err(ProcessorError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }

        let start = Instant::now();
        let workers = self.config.max_parallel_conversions.max(1);
        let capacity = self.config.channel_capacity.max(1);
        info!(
            root = %root.display(),
            tools = self.tools.name(),
            workers,
            dry_run = self.config.dry_run,
            "Starting sweep"
        );

        let cancelled = Arc::new(AtomicBool::new(false));
        let (candidate_tx, mut candidate_rx) = mpsc::channel(capacity);
        let discovery = spawn_discovery(
            root.to_path_buf(),
            self.config.follow_links,
            candidate_tx,
            Arc::clone(&cancelled),
        );

        let (outcomes, aggregator) = create_outcome_system(capacity);
        let aggregator = tokio::spawn(aggregator.run());

        let semaphore = Arc::new(Semaphore::new(workers));
        let locks = Arc::new(TargetLocks::new());
        let mut tasks: JoinSet<Result<(), ProcessorError>> = JoinSet::new();
        let mut fatal: Option<ProcessorError> = None;

        while let Some(candidate) = candidate_rx.recv().await {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            // A worker that hit a fatal error sets the flag before giving
            // its permit back, so this sees it before the next file starts.
            if let Some(e) = reap_finished(&mut tasks) {
                fatal = Some(e);
            }
            if fatal.is_some() || cancelled.load(Ordering::SeqCst) {
                break;
            }

            let tools = Arc::clone(&self.tools);
            let outcomes = outcomes.clone();
            let locks = Arc::clone(&locks);
            let cancelled = Arc::clone(&cancelled);
            let dry_run = self.config.dry_run;

            tasks.spawn(async move {
                let _permit = permit;
                if cancelled.load(Ordering::SeqCst) {
                    return Ok(());
                }
                match process_file(&*tools, &candidate, dry_run, &locks).await {
                    Ok(outcome) => {
                        outcomes.record(candidate.path(), outcome).await;
                        Ok(())
                    }
                    Err(e) => {
                        cancelled.store(true, Ordering::SeqCst);
                        Err(e)
                    }
                }
            });
        }

        if fatal.is_none() && !cancelled.load(Ordering::SeqCst) {
            while let Some(joined) = tasks.join_next().await {
                if let Some(e) = flatten(joined) {
                    cancelled.store(true, Ordering::SeqCst);
                    fatal = Some(e);
                    break;
                }
            }
        }

        if cancelled.load(Ordering::SeqCst) || fatal.is_some() {
            cancelled.store(true, Ordering::SeqCst);
            drop(candidate_rx);
            // In-flight files run to a terminal state; unstarted ones bail out
            // on the flag.
            while let Some(joined) = tasks.join_next().await {
                if let Some(e) = flatten(joined) {
                    fatal.get_or_insert(e);
                }
            }
            aggregator.abort();
            let error = fatal.unwrap_or_else(|| {
                ProcessorError::Task("run cancelled without a recorded error".to_string())
            });
            error!(error = %error, "Sweep aborted");
            return Err(error);
        }

        drop(outcomes);
        if let Err(e) = discovery.await {
            warn!(error = %e, "Discovery task ended abnormally");
        }
        let summary = aggregator
            .await
            .map_err(|e| ProcessorError::Task(e.to_string()))?;

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            files = summary.total(),
            "Sweep finished"
        );
        Ok(summary)
    }
}

/// Collects already finished tasks without waiting. Returns the first fatal
/// error among them.
fn reap_finished(tasks: &mut JoinSet<Result<(), ProcessorError>>) -> Option<ProcessorError> {
    let mut fatal = None;
    while let Some(joined) = tasks.try_join_next() {
        if let Some(e) = flatten(joined) {
            fatal.get_or_insert(e);
        }
    }
    fatal
}

fn flatten(
    joined: Result<Result<(), ProcessorError>, tokio::task::JoinError>,
) -> Option<ProcessorError> {
    match joined {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e),
        Err(e) if e.is_cancelled() => None,
        Err(e) => Some(ProcessorError::Task(e.to_string())),
    }
}

/// Runs probe, plan, transcode and delete for one file.
///
/// Every per-file problem becomes an outcome; only a missing transcoder is
/// returned as an error.
pub async fn process_file<T: MediaTools + ?Sized>(
    tools: &T,
    candidate: &CandidateFile,
    dry_run: bool,
    locks: &TargetLocks,
) -> Result<ConversionOutcome, ProcessorError> {
    let path = candidate.path();
    let probe_result = probe(tools, path).await;
    debug!(path = %path.display(), probe = %probe_result, "Probed");

    let target = candidate.target_path();
    let _guard = locks.lock(&target).await;
    let target_exists = match tokio::fs::try_exists(&target).await {
        Ok(exists) => exists,
        Err(e) => {
            // Unknown counts as present so nothing gets clobbered.
            warn!(target = %target.display(), error = %e, "Could not check target");
            true
        }
    };

    match decide(candidate, &probe_result, target_exists) {
        ConversionDecision::SkipWrongCodec => {
            info!(path = %path.display(), codec = %probe_result, "Skipping (not ALAC)");
            Ok(ConversionOutcome::SkippedWrongCodec)
        }
        ConversionDecision::SkipTargetExists => {
            warn!(path = %path.display(), "Skipping (already exists)");
            Ok(ConversionOutcome::SkippedExists)
        }
        ConversionDecision::Convert if dry_run => {
            info!(path = %path.display(), target = %target.display(), "Would convert");
            Ok(ConversionOutcome::Planned)
        }
        ConversionDecision::Convert => {
            info!(path = %path.display(), "Converting");
            match transcode(tools, path, &target).await {
                Ok(()) => Ok(remove_source(path).await),
                Err(TranscodeError::ToolNotFound { path: tool }) => {
                    error!(tool = %tool.display(), "ffmpeg not found, please install it");
                    Err(ProcessorError::ToolNotFound { path: tool })
                }
                Err(TranscodeError::Failed(reason)) => {
                    error!(path = %path.display(), "Error converting: {}", reason);
                    Ok(ConversionOutcome::Failed(reason))
                }
            }
        }
    }
}

async fn remove_source(path: &Path) -> ConversionOutcome {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            info!(path = %path.display(), "Converted and deleted");
            ConversionOutcome::Converted
        }
        Err(e) => {
            error!(
                path = %path.display(),
                error = %e,
                "Converted but could not delete source"
            );
            ConversionOutcome::Failed(FailureReason::SourceNotRemoved {
                message: e.to_string(),
            })
        }
    }
}
