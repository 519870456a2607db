//! Candidate discovery.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;
use walkdir::WalkDir;

use crate::planner::CandidateFile;

/// Lazily enumerates candidates under `root`, in filesystem order.
///
/// Unreadable entries are logged and skipped.
pub fn discover(root: PathBuf, follow_links: bool) -> impl Iterator<Item = CandidateFile> {
    WalkDir::new(root)
        .follow_links(follow_links)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| CandidateFile::from_path(entry.into_path()))
}

/// Runs [`discover`] on a blocking thread, feeding `tx`.
///
/// Stops early once `cancelled` is set or the receiver goes away.
pub(crate) fn spawn_discovery(
    root: PathBuf,
    follow_links: bool,
    tx: mpsc::Sender<CandidateFile>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        for candidate in discover(root, follow_links) {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            if tx.blocking_send(candidate).is_err() {
                break;
            }
        }
    })
}
