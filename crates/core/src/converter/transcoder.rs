//! Verified transcoding on top of [`MediaTools`].

use std::path::Path;
use tracing::{debug, warn};

use super::error::{ConverterError, TranscodeError};
use super::traits::MediaTools;
use crate::outcome::FailureReason;

/// Converts `source` into `target` and confirms the result is on disk.
///
/// A zero exit status alone is not trusted: the target must exist
/// afterwards. On any file-local failure, whatever the tool left at `target`
/// is removed so the source stays the only copy. Callers must only pass a
/// `target` that did not exist before the call.
pub async fn transcode<T: MediaTools + ?Sized>(
    tools: &T,
    source: &Path,
    target: &Path,
) -> Result<(), TranscodeError> {
    let mut partial = PartialTarget::new(target);
    let failure = match tools.transcode(source, target).await {
        Ok(()) => match tokio::fs::try_exists(target).await {
            Ok(true) => {
                partial.keep();
                return Ok(());
            }
            Ok(false) => FailureReason::OutputMissing,
            Err(e) => FailureReason::io(e.to_string()),
        },
        Err(ConverterError::FfmpegNotFound { path }) => {
            return Err(TranscodeError::ToolNotFound { path })
        }
        Err(ConverterError::NonZeroExit { stderr, .. }) => FailureReason::Transcode { stderr },
        Err(ConverterError::Timeout { timeout_secs, .. }) => FailureReason::Timeout {
            secs: timeout_secs,
        },
        Err(e) => FailureReason::io(e.to_string()),
    };

    remove_partial_target(target).await;
    partial.keep();
    Err(TranscodeError::Failed(failure))
}

/// Removes `target` if the transcode future is dropped before it settles.
struct PartialTarget<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> PartialTarget<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    fn keep(&mut self) {
        self.armed = false;
    }
}

impl Drop for PartialTarget<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed interrupted output"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Could not remove interrupted output"
            ),
        }
    }
}

async fn remove_partial_target(target: &Path) {
    match tokio::fs::remove_file(target).await {
        Ok(()) => debug!(path = %target.display(), "Removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            path = %target.display(),
            error = %e,
            "Could not remove partial output"
        ),
    }
}
