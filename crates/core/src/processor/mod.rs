//! Processor module: the tree walk that drives the conversion pipeline.
//!
//! Discovery runs on a blocking thread and feeds candidates through a
//! bounded channel. A semaphore caps how many files are in flight, a
//! per-target lock keeps files that map to the same FLAC path apart, and a
//! shared cancellation flag keeps new files from starting once the
//! transcoder turns out to be missing.
//!
//! # Example
//!
//! ```ignore
//! use flacsweep_core::converter::{ConverterConfig, FfmpegTools};
//! use flacsweep_core::processor::{ProcessorConfig, TreeProcessor};
//!
//! let tools = FfmpegTools::new(ConverterConfig::default());
//! let processor = TreeProcessor::new(ProcessorConfig::default().with_max_conversions(4), tools);
//!
//! let summary = processor.run(Path::new("/music")).await?;
//! println!("Summary: {}", summary);
//! ```

mod config;
mod discovery;
mod error;
mod locks;
mod pipeline;

pub use config::ProcessorConfig;
pub use discovery::discover;
pub use error::ProcessorError;
pub use locks::{TargetGuard, TargetLocks};
pub use pipeline::{process_file, TreeProcessor};
