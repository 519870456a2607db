//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ConverterError;

/// The external tools the sweep drives.
///
/// The real implementation shells out to ffprobe and ffmpeg; tests swap in
/// [`MockMediaTools`](crate::testing::MockMediaTools).
#[async_trait]
pub trait MediaTools: Send + Sync {
    /// Returns the name of this implementation.
    fn name(&self) -> &str;

    /// Reports the codec of the first audio stream of `path`.
    async fn probe_codec(&self, path: &Path) -> Result<String, ConverterError>;

    /// Transcodes `source` into FLAC at `target`, carrying over all metadata
    /// tags. Overwrites `target` if it exists.
    async fn transcode(&self, source: &Path, target: &Path) -> Result<(), ConverterError>;
}
