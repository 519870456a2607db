//! Converter module for probing and transcoding audio files.
//!
//! The external tools sit behind the [`MediaTools`] trait. On top of it,
//! [`probe`] turns a tool call into a [`ProbeResult`] that never fails, and
//! [`transcode`] runs the conversion and verifies the output exists.
//!
//! # Example
//!
//! ```ignore
//! use flacsweep_core::converter::{probe, transcode, ConverterConfig, FfmpegTools};
//!
//! let tools = FfmpegTools::new(ConverterConfig::default());
//!
//! let result = probe(&tools, Path::new("/music/song.m4a")).await;
//! if result.is_format(AudioFormat::Alac) {
//!     transcode(&tools, Path::new("/music/song.m4a"), Path::new("/music/song.flac")).await?;
//! }
//! ```

mod config;
mod error;
mod ffmpeg;
mod prober;
mod traits;
mod transcoder;
mod types;

pub use config::ConverterConfig;
pub use error::{ConverterError, TranscodeError};
pub use ffmpeg::FfmpegTools;
pub use prober::probe;
pub use traits::MediaTools;
pub use transcoder::transcode;
pub use types::{AudioFormat, ProbeResult, SOURCE_FORMAT, TARGET_FORMAT};
