use super::for_each_comment_stripped_line;
use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

static PRAGMA_CARET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"pragma\s+solidity\s+\^(\d+)\.(\d+)").unwrap());

/// `SWC-103`: a `pragma solidity` line caret-pinned to one of the long-deprecated `0.4`–`0.7`
/// minor series.
pub struct PragmaVersion;

impl Detector for PragmaVersion {
    fn id(&self) -> &'static str {
        "SWC-103"
    }

    fn description(&self) -> &'static str {
        "Contract is pinned to an outdated Solidity compiler version series"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn fix_suggestion(&self) -> &'static str {
        "Upgrade to a current Solidity compiler release to receive the latest security fixes."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        for_each_comment_stripped_line(ctx, |line_no, text| {
            let caps = PRAGMA_CARET_RE.captures(text)?;
            let major: u32 = caps[1].parse().ok()?;
            let minor: u32 = caps[2].parse().ok()?;
            (major < 1 && (4..=7).contains(&minor)).then(|| RawFinding::at(line_no))
        })
    }
}
