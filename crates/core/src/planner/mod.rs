//! Conversion planning: which files are candidates and what to do with each.

mod decision;
mod types;

pub use decision::decide;
pub use types::{CandidateFile, ConversionDecision};
