use crate::converter::{ProbeResult, SOURCE_FORMAT};

use super::types::{CandidateFile, ConversionDecision};

/// Decides what to do with `candidate`.
///
/// Pure: the caller checks whether the target exists and passes the answer
/// in. Skipping existing targets is what makes a rerun over an already
/// converted tree a no-op. `_candidate` is unused today; it keeps the
/// signature stable for rules that look at the file itself.
pub fn decide(
    _candidate: &CandidateFile,
    probe: &ProbeResult,
    target_exists: bool,
) -> ConversionDecision {
    if !probe.is_format(SOURCE_FORMAT) {
        ConversionDecision::SkipWrongCodec
    } else if target_exists {
        ConversionDecision::SkipTargetExists
    } else {
        ConversionDecision::Convert
    }
}
