//! Testing utilities and mock implementations.
//!
//! [`MockMediaTools`] stands in for ffprobe and ffmpeg so the whole pipeline
//! can run against a temporary directory without any external binaries.

mod mock_tools;

pub use mock_tools::{MockMediaTools, RecordedTranscode, TranscodeBehavior, FLAC_BYTES};
