//! Core library for flacsweep: finds ALAC files in a directory tree,
//! converts them to FLAC with ffmpeg and removes the originals.

pub mod config;
pub mod converter;
pub mod outcome;
pub mod planner;
pub mod processor;
pub mod testing;

pub use config::{validate_config, Config, ConfigError};
pub use converter::{
    probe, transcode, AudioFormat, ConverterConfig, ConverterError, FfmpegTools, MediaTools,
    ProbeResult, TranscodeError, SOURCE_FORMAT, TARGET_FORMAT,
};
pub use outcome::{
    create_outcome_system, ConversionOutcome, FailedFile, FailureReason, OutcomeAggregator,
    OutcomeEvent, OutcomeHandle, OutcomeRecorder, RunSummary, SummaryRecorder,
};
pub use planner::{decide, CandidateFile, ConversionDecision};
pub use processor::{discover, process_file, ProcessorConfig, ProcessorError, TreeProcessor};
