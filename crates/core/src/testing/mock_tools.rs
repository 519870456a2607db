//! Mock media tools for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{ConverterError, MediaTools};

/// What a successful mock transcode leaves at the target.
pub const FLAC_BYTES: &[u8] = b"fLaC\0\0\0\x22";

/// How the mock behaves when asked to transcode a given source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeBehavior {
    /// Write a small FLAC-looking file at the target and exit zero.
    Succeed,
    /// Exit zero without writing anything.
    SucceedWithoutOutput,
    /// Exit non-zero with the given stderr, writing nothing.
    Fail { stderr: String },
    /// Write a truncated target, then exit non-zero.
    FailAfterPartialWrite { stderr: String },
    /// Write a truncated target, keep running for the given time, then
    /// finish the file and exit zero.
    SucceedAfter(Duration),
    /// Report ffmpeg as absent for this source only.
    ToolMissing,
}

/// A recorded transcode call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTranscode {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Mock implementation of the MediaTools trait.
///
/// Provides controllable behavior for testing:
/// - Per-path probe results, with an optional default codec
/// - Per-path transcode behavior
/// - A missing-ffmpeg switch
/// - Recorded transcode calls and peak concurrency
///
/// # Example
///
/// ```rust,ignore
/// use flacsweep_core::testing::MockMediaTools;
///
/// let tools = MockMediaTools::new();
/// tools.set_codec("/music/song.m4a", "alac").await;
///
/// let processor = TreeProcessor::new(ProcessorConfig::default(), tools.clone());
/// let summary = processor.run(Path::new("/music")).await?;
///
/// assert_eq!(tools.transcode_count().await, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockMediaTools {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    codecs: RwLock<HashMap<PathBuf, String>>,
    probe_errors: RwLock<HashMap<PathBuf, ConverterError>>,
    default_codec: RwLock<Option<String>>,
    behaviors: RwLock<HashMap<PathBuf, TranscodeBehavior>>,
    ffmpeg_missing: RwLock<bool>,
    transcode_delay_ms: RwLock<u64>,
    transcodes: RwLock<Vec<RecordedTranscode>>,
    probes: AtomicUsize,
    active: AtomicUsize,
    peak_active: AtomicUsize,
}

impl MockMediaTools {
    /// Create a new mock. Unknown files fail to probe until a codec is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the codec reported for a specific path.
    pub async fn set_codec(&self, path: impl AsRef<Path>, codec: &str) {
        self.inner
            .codecs
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), codec.to_string());
    }

    /// Set the codec reported for paths without a specific entry.
    pub async fn set_default_codec(&self, codec: &str) {
        *self.inner.default_codec.write().await = Some(codec.to_string());
    }

    /// Make probing a specific path fail with `error`.
    pub async fn set_probe_error(&self, path: impl AsRef<Path>, error: ConverterError) {
        self.inner
            .probe_errors
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), error);
    }

    /// Configure how transcoding `source` behaves.
    pub async fn set_transcode_behavior(
        &self,
        source: impl AsRef<Path>,
        behavior: TranscodeBehavior,
    ) {
        self.inner
            .behaviors
            .write()
            .await
            .insert(source.as_ref().to_path_buf(), behavior);
    }

    /// Simulate ffmpeg being absent from the system.
    pub async fn set_ffmpeg_missing(&self, missing: bool) {
        *self.inner.ffmpeg_missing.write().await = missing;
    }

    /// Set the simulated transcode duration.
    pub async fn set_transcode_delay(&self, delay: Duration) {
        *self.inner.transcode_delay_ms.write().await = delay.as_millis() as u64;
    }

    /// Get all recorded transcode calls.
    pub async fn recorded_transcodes(&self) -> Vec<RecordedTranscode> {
        self.inner.transcodes.read().await.clone()
    }

    /// Get the number of transcode calls.
    pub async fn transcode_count(&self) -> usize {
        self.inner.transcodes.read().await.len()
    }

    /// Get the number of probe calls.
    pub fn probe_count(&self) -> usize {
        self.inner.probes.load(Ordering::SeqCst)
    }

    /// Highest number of transcodes that were running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.inner.peak_active.load(Ordering::SeqCst)
    }
}

/// Keeps the active-transcode counter balanced even if the call is aborted.
struct ActiveGuard<'a>(&'a AtomicUsize);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaTools for MockMediaTools {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe_codec(&self, path: &Path) -> Result<String, ConverterError> {
        self.inner.probes.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.inner.probe_errors.write().await.remove(path) {
            return Err(error);
        }
        if let Some(codec) = self.inner.codecs.read().await.get(path) {
            return Ok(codec.clone());
        }
        if let Some(codec) = self.inner.default_codec.read().await.as_ref() {
            return Ok(codec.clone());
        }

        Err(ConverterError::non_zero_exit(
            "ffprobe",
            Some(1),
            format!("{}: Invalid data found when processing input", path.display()).as_bytes(),
        ))
    }

    async fn transcode(&self, source: &Path, target: &Path) -> Result<(), ConverterError> {
        if *self.inner.ffmpeg_missing.read().await {
            return Err(ConverterError::FfmpegNotFound {
                path: PathBuf::from("ffmpeg"),
            });
        }

        let active = self.inner.active.fetch_add(1, Ordering::SeqCst) + 1;
        let _active = ActiveGuard(&self.inner.active);
        self.inner.peak_active.fetch_max(active, Ordering::SeqCst);

        self.inner.transcodes.write().await.push(RecordedTranscode {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
        });

        let delay = *self.inner.transcode_delay_ms.read().await;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let behavior = self
            .inner
            .behaviors
            .read()
            .await
            .get(source)
            .cloned()
            .unwrap_or(TranscodeBehavior::Succeed);

        match behavior {
            TranscodeBehavior::Succeed => {
                tokio::fs::write(target, FLAC_BYTES).await?;
                Ok(())
            }
            TranscodeBehavior::SucceedWithoutOutput => Ok(()),
            TranscodeBehavior::Fail { stderr } => Err(ConverterError::non_zero_exit(
                "ffmpeg",
                Some(1),
                stderr.as_bytes(),
            )),
            TranscodeBehavior::SucceedAfter(duration) => {
                tokio::fs::write(target, b"fLa").await?;
                tokio::time::sleep(duration).await;
                tokio::fs::write(target, FLAC_BYTES).await?;
                Ok(())
            }
            TranscodeBehavior::ToolMissing => Err(ConverterError::FfmpegNotFound {
                path: PathBuf::from("ffmpeg"),
            }),
            TranscodeBehavior::FailAfterPartialWrite { stderr } => {
                tokio::fs::write(target, b"fLa").await?;
                Err(ConverterError::non_zero_exit(
                    "ffmpeg",
                    Some(1),
                    stderr.as_bytes(),
                ))
            }
        }
    }
}
