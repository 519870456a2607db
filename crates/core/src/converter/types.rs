//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio formats the sweep knows how to recognize or produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    /// Apple Lossless
    Alac,
    /// Free Lossless Audio Codec
    Flac,
}

impl AudioFormat {
    /// Returns the canonical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Alac => "m4a",
            Self::Flac => "flac",
        }
    }

    /// Every extension (lowercase, without the dot) a file of this format
    /// may carry.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Alac => &["m4a", "alac"],
            Self::Flac => &["flac"],
        }
    }

    /// Codec identifier as reported by ffprobe's `codec_name`.
    pub fn codec_name(&self) -> &'static str {
        match self {
            Self::Alac => "alac",
            Self::Flac => "flac",
        }
    }

    /// Returns the ffmpeg encoder name for this format.
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            Self::Alac => "alac",
            Self::Flac => "flac",
        }
    }

    /// Whether `ext` (any case, surrounding whitespace ignored) belongs to
    /// this format.
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.trim().to_lowercase();
        self.extensions().contains(&ext.as_str())
    }
}

/// Format of the files the sweep converts.
pub const SOURCE_FORMAT: AudioFormat = AudioFormat::Alac;

/// Format the sweep converts into.
pub const TARGET_FORMAT: AudioFormat = AudioFormat::Flac;

/// Result of inspecting the first audio stream of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// Lowercase, trimmed codec identifier.
    Codec(String),
    /// The stream could not be inspected. Carries a human-readable reason.
    Failed(String),
}

impl ProbeResult {
    /// Returns the codec name, if the probe succeeded.
    pub fn codec(&self) -> Option<&str> {
        match self {
            Self::Codec(codec) => Some(codec),
            Self::Failed(_) => None,
        }
    }

    /// Whether the probed codec is `format`. A failed probe never matches.
    pub fn is_format(&self, format: AudioFormat) -> bool {
        self.codec()
            .is_some_and(|codec| codec.eq_ignore_ascii_case(format.codec_name()))
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(codec) => write!(f, "{}", codec),
            Self::Failed(reason) => write!(f, "probe failed ({})", reason),
        }
    }
}
