use crate::ast::walker::walk;
use crate::ast::NodeKind;
use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};

/// Flags `x.transfer(...)` / `x.send(...)` / `x.call(...)` where `x` is a direct function
/// parameter — an address the caller fully controls can receive an arbitrary amount of Ether.
pub struct ArbitrarySendEth;

impl Detector for ArbitrarySendEth {
    fn id(&self) -> &'static str {
        "arbitrary-send-eth"
    }

    fn description(&self) -> &'static str {
        "Ether is sent to an address supplied directly as a function parameter"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn fix_suggestion(&self) -> &'static str {
        "Restrict the recipient to a value derived from access-controlled state, not a raw caller-supplied parameter."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        let Some(ast) = &ctx.ast else { return Vec::new() };
        let mut findings = Vec::new();
        walk(ast, &mut |node, walk_ctx| {
            if node.is(NodeKind::MemberAccess) {
                if let Some(member) = node.member_name() {
                    if matches!(member, "transfer" | "send" | "call") {
                        if let Some(expr) = node.get("expression") {
                            if expr.is(NodeKind::Identifier) {
                                if let Some(name) = expr.name() {
                                    if walk_ctx.params.contains(name) {
                                        findings
                                            .push(RawFinding::at(ctx.line_index.line_from_src(node.src())));
                                    }
                                }
                            }
                        }
                    }
                }
            }
        });
        findings
    }
}
