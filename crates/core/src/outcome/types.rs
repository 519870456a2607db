//! Types for the outcome module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a single file could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The transcoding tool exited non-zero.
    Transcode { stderr: String },
    /// The tool reported success but no target file exists.
    OutputMissing,
    /// The tool ran past the configured timeout and was killed.
    Timeout { secs: u64 },
    /// Running the tool or checking its output failed.
    Io { message: String },
    /// The target was written but the source could not be deleted.
    SourceNotRemoved { message: String },
}

impl FailureReason {
    /// Creates an I/O failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transcode { stderr } if stderr.is_empty() => {
                write!(f, "transcoder exited with an error")
            }
            Self::Transcode { stderr } => write!(f, "transcoder exited with an error:\n{}", stderr),
            Self::OutputMissing => write!(f, "transcoder succeeded but wrote no output"),
            Self::Timeout { secs } => write!(f, "transcoder timed out after {}s", secs),
            Self::Io { message } => write!(f, "I/O error: {}", message),
            Self::SourceNotRemoved { message } => {
                write!(f, "converted but could not delete source: {}", message)
            }
        }
    }
}

/// What happened to one candidate file during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Target written and verified, source deleted.
    Converted,
    /// Would have been converted; dry runs only.
    Planned,
    /// Not encoded with the source codec, or could not be probed.
    SkippedWrongCodec,
    /// A converted sibling already exists.
    SkippedExists,
    /// Conversion failed; the source is untouched.
    Failed(FailureReason),
}

/// A file that failed, kept for the end-of-run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: FailureReason,
}

/// Counts of every outcome across a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub converted: usize,
    pub planned: usize,
    pub skipped_wrong_codec: usize,
    pub skipped_exists: usize,
    pub failed: usize,
    /// Every failed file, in the order the failures were recorded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailedFile>,
}

impl RunSummary {
    /// Counts one outcome.
    pub fn record(&mut self, path: &Path, outcome: &ConversionOutcome) {
        match outcome {
            ConversionOutcome::Converted => self.converted += 1,
            ConversionOutcome::Planned => self.planned += 1,
            ConversionOutcome::SkippedWrongCodec => self.skipped_wrong_codec += 1,
            ConversionOutcome::SkippedExists => self.skipped_exists += 1,
            ConversionOutcome::Failed(reason) => {
                self.failed += 1;
                self.failures.push(FailedFile {
                    path: path.to_path_buf(),
                    reason: reason.clone(),
                });
            }
        }
    }

    /// Both kinds of skip together.
    pub fn skipped(&self) -> usize {
        self.skipped_wrong_codec + self.skipped_exists
    }

    /// Number of outcomes recorded.
    pub fn total(&self) -> usize {
        self.converted + self.planned + self.skipped() + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} converted, {} skipped ({} wrong codec, {} already converted), {} failed",
            self.converted,
            self.skipped(),
            self.skipped_wrong_codec,
            self.skipped_exists,
            self.failed
        )?;
        if self.planned > 0 {
            write!(f, ", {} would be converted", self.planned)?;
        }
        Ok(())
    }
}
