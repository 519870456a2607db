//! Codec probing on top of [`MediaTools`].

use std::path::Path;
use tracing::warn;

use super::traits::MediaTools;
use super::types::ProbeResult;

/// Inspects the first audio stream of `path`.
///
/// Never fails: any tool error, including a missing ffprobe, becomes
/// [`ProbeResult::Failed`] and is logged as a warning.
pub async fn probe<T: MediaTools + ?Sized>(tools: &T, path: &Path) -> ProbeResult {
    match tools.probe_codec(path).await {
        Ok(codec) => {
            let codec = codec.trim().to_lowercase();
            if codec.is_empty() {
                warn!(path = %path.display(), "Could not probe file: empty codec name");
                ProbeResult::Failed("empty codec name".to_string())
            } else {
                ProbeResult::Codec(codec)
            }
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not probe file");
            ProbeResult::Failed(e.to_string())
        }
    }
}
