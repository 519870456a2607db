//! Error types for the processor module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a whole run. Per-file problems never surface here.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The transcoding binary is missing; nothing further can be converted.
    #[error("FFmpeg not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// The root is not a readable directory.
    #[error("Not a directory: {path}")]
    InvalidRoot { path: PathBuf },

    /// A worker task panicked.
    #[error("Worker task failed: {0}")]
    Task(String),
}
