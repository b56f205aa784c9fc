use super::strip_comment;
use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};

/// `SWC-105`: a line-level heuristic for Ether leaving the contract with no visible access
/// control — either a bare `selfdestruct` or a `msg.sender.transfer` with no `require`/`owner`
/// guard on the same line.
pub struct UnprotectedWithdraw;

impl Detector for UnprotectedWithdraw {
    fn id(&self) -> &'static str {
        "SWC-105"
    }

    fn description(&self) -> &'static str {
        "Ether leaves the contract with no visible caller authorization check"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn fix_suggestion(&self) -> &'static str {
        "Guard withdrawal and self-destruct paths with an owner or role check (e.g. onlyOwner)."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        let mut findings = Vec::new();
        for (i, raw_line) in ctx.lines().iter().enumerate() {
            let line_no = i + 1;
            let line = strip_comment(raw_line);
            if line.contains("selfdestruct")
                && !line.contains("owner")
                && !line.contains("msg.sender")
                && !line.contains("require")
            {
                findings.push(RawFinding::at(line_no));
                continue;
            }
            if line.contains("msg.sender.transfer")
                && !line.contains("require")
                && !line.contains("owner")
                && !line.contains("onlyOwner")
            {
                findings.push(RawFinding::at(line_no));
            }
        }
        findings
    }
}
