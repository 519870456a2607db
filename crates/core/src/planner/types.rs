//! Types for the planner module.

use std::path::{Path, PathBuf};

use crate::converter::{SOURCE_FORMAT, TARGET_FORMAT};

/// A file eligible for conversion based on its extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateFile {
    path: PathBuf,
}

impl CandidateFile {
    /// Wraps `path` if its extension is one of the accepted source
    /// extensions (case-insensitive).
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        if is_source_extension(&path) {
            Some(Self { path })
        } else {
            None
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path with the extension swapped for the target format's.
    pub fn target_path(&self) -> PathBuf {
        self.path.with_extension(TARGET_FORMAT.extension())
    }
}

fn is_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SOURCE_FORMAT.matches_extension(ext))
        .unwrap_or(false)
}

/// What to do with a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDecision {
    Convert,
    SkipWrongCodec,
    SkipTargetExists,
}
