//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

use crate::outcome::FailureReason;

/// Errors raised by a [`MediaTools`](super::MediaTools) implementation.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// The tool ran but exited unsuccessfully.
    #[error("{program} exited with code: {code:?}")]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// FFprobe succeeded but printed nothing usable.
    #[error("Failed to parse probe output: {reason}")]
    ProbeUnparseable { reason: String },

    /// The tool did not finish within the configured limit.
    #[error("{program} timed out after {timeout_secs} seconds")]
    Timeout { program: String, timeout_secs: u64 },

    /// I/O error while running the tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a non-zero exit error from captured stderr bytes.
    pub fn non_zero_exit(program: impl Into<String>, code: Option<i32>, stderr: &[u8]) -> Self {
        Self::NonZeroExit {
            program: program.into(),
            code,
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }

    /// Creates a probe parse error.
    pub fn unparseable(reason: impl Into<String>) -> Self {
        Self::ProbeUnparseable {
            reason: reason.into(),
        }
    }
}

/// Outcome of a failed [`transcode`](super::transcode) call.
///
/// `ToolNotFound` aborts the whole run; `Failed` only concerns one file.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The transcoding binary is missing.
    #[error("FFmpeg not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// The file could not be converted.
    #[error("{0}")]
    Failed(FailureReason),
}
