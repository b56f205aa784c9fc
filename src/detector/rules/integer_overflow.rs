use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;

static ARITHMETIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\+|-|\*|\+=|-=|\*=)").unwrap());

/// `SWC-101`: unchecked arithmetic on a Solidity version older than the 0.8.0 line, which
/// introduced built-in overflow/underflow reverts.
pub struct IntegerOverflow;

impl Detector for IntegerOverflow {
    fn id(&self) -> &'static str {
        "SWC-101"
    }

    fn description(&self) -> &'static str {
        "Arithmetic operation on a pre-0.8.0 compiler with no SafeMath guard"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn confidence(&self) -> crate::detector::Confidence {
        crate::detector::Confidence::Medium
    }

    fn fix_suggestion(&self) -> &'static str {
        "For Solidity < 0.8.0, use OpenZeppelin's SafeMath for all arithmetic. For >= 0.8.0, avoid unchecked blocks unless audited."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        if matches!(&ctx.solidity_version, Some(v) if !is_pre_0_8(v)) {
            return Vec::new();
        }

        let mut findings = Vec::new();
        for (i, line) in ctx.lines().iter().enumerate() {
            if line.contains("//") || line.contains("import") {
                continue;
            }
            if !ARITHMETIC_RE.is_match(line) {
                continue;
            }
            if line.contains("for (") {
                continue;
            }
            if line.contains(".add(") || line.contains(".sub(") || line.contains(".mul(") {
                continue;
            }
            findings.push(RawFinding::at(i + 1));
        }
        findings
    }
}

fn is_pre_0_8(version: &Version) -> bool {
    version.major == 0 && version.minor < 8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_ctx;

    const SOURCE: &str = "pragma solidity ^0.7.6;\ncontract C { function a(uint x,uint y) public pure returns (uint){ return x+y; } }\n";

    /// Spec §8 scenario 4: flagged under a pre-0.8.0 pragma...
    #[test]
    fn flags_arithmetic_under_pre_0_8_pragma() {
        let mut ctx = test_ctx(SOURCE, None);
        ctx.solidity_version = Some(Version::new(0, 7, 6));
        assert!(!IntegerOverflow.run(&ctx).is_empty());
    }

    /// ...but not under `^0.8.0`, which reverts on overflow by default.
    #[test]
    fn silent_under_0_8_0_pragma() {
        let mut ctx = test_ctx(SOURCE, None);
        ctx.solidity_version = Some(Version::new(0, 8, 0));
        assert!(IntegerOverflow.run(&ctx).is_empty());
    }

    #[test]
    fn scans_when_version_unknown() {
        let ctx = test_ctx(SOURCE, None);
        assert!(ctx.solidity_version.is_none());
        assert!(!IntegerOverflow.run(&ctx).is_empty());
    }
}
