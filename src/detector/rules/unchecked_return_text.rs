use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

static LOW_LEVEL_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(call|send|delegatecall)\s*\(").unwrap());
static CALL_BRACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.call\s*\{.*\}\s*\(").unwrap());

/// `SWC-104` (text): a low-level call whose return value does not appear to be inspected on the
/// same line (no `require(`/`assert(`/`if(`/`if (`/`=`).
pub struct UncheckedReturnText;

impl Detector for UncheckedReturnText {
    fn id(&self) -> &'static str {
        "SWC-104"
    }

    fn description(&self) -> &'static str {
        "Low-level call's return value is not checked"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn fix_suggestion(&self) -> &'static str {
        "Check the return value of call()/send(), or use transfer()/sendValue() instead."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        let mut findings = Vec::new();
        for (i, line) in ctx.lines().iter().enumerate() {
            if !LOW_LEVEL_CALL_RE.is_match(line) && !CALL_BRACE_RE.is_match(line) {
                continue;
            }
            if line.contains("//") {
                continue;
            }
            let is_checked = line.contains("require(")
                || line.contains("assert(")
                || line.contains("if (")
                || line.contains("if(")
                || line.contains('=');
            if !is_checked {
                findings.push(RawFinding::at(i + 1));
            }
        }
        findings
    }
}
