use super::for_each_comment_stripped_line;
use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

static CALL_VALUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.call\.value\s*\(").unwrap());
static CALL_BRACE_VALUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.call\s*\{[^}]*value:").unwrap());

/// `SWC-107` (text): lines matching the legacy `.call.value(` form or a `.call{...value:...}`
/// literal, outside comments.
pub struct ReentrancyText;

impl Detector for ReentrancyText {
    fn id(&self) -> &'static str {
        "SWC-107"
    }

    fn description(&self) -> &'static str {
        "A low-level value-transferring call is made without first updating contract state"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn fix_suggestion(&self) -> &'static str {
        "Update contract state before performing external calls (checks-effects-interactions)."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        for_each_comment_stripped_line(ctx, |line_no, text| {
            (CALL_VALUE_RE.is_match(text) || CALL_BRACE_VALUE_RE.is_match(text))
                .then(|| RawFinding::at(line_no))
        })
    }
}
