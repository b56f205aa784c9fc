use super::for_each_comment_stripped_line;
use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};

/// `SWC-112`: any non-comment line containing `.delegatecall`.
pub struct DelegatecallText;

impl Detector for DelegatecallText {
    fn id(&self) -> &'static str {
        "SWC-112"
    }

    fn description(&self) -> &'static str {
        "delegatecall executes callee code in the caller's storage context"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn fix_suggestion(&self) -> &'static str {
        "Avoid delegatecall to untrusted or user-controlled addresses; pin the callee to a known, audited library."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        for_each_comment_stripped_line(ctx, |line_no, text| {
            text.contains(".delegatecall").then(|| RawFinding::at(line_no))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_ctx;

    /// Spec §8 scenario 5's text-level half: one `SWC-112` finding at the `x.delegatecall` line.
    #[test]
    fn flags_delegatecall_line() {
        let ctx = test_ctx("contract D { function f(address x) public { x.delegatecall(\"\"); } }\n", None);
        let findings = DelegatecallText.run(&ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 1);
    }

    #[test]
    fn ignores_commented_out_delegatecall() {
        let ctx = test_ctx("// x.delegatecall(\"\");\n", None);
        assert!(DelegatecallText.run(&ctx).is_empty());
    }
}
