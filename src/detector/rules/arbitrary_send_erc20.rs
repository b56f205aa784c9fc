use crate::ast::walker::walk;
use crate::ast::NodeKind;
use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};

/// Flags `token.transferFrom(from, ...)` where `from` is a direct function parameter — a
/// caller-controlled `from` address lets anyone drain tokens they have merely approved.
pub struct ArbitrarySendErc20;

impl Detector for ArbitrarySendErc20 {
    fn id(&self) -> &'static str {
        "arbitrary-send-erc20"
    }

    fn description(&self) -> &'static str {
        "transferFrom's source address is a function parameter rather than the caller"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn fix_suggestion(&self) -> &'static str {
        "Use msg.sender as the transferFrom source, or otherwise verify the caller is authorized to move funds from the given address."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        let Some(ast) = &ctx.ast else { return Vec::new() };
        let mut findings = Vec::new();
        walk(ast, &mut |node, walk_ctx| {
            if !node.is(NodeKind::FunctionCall) {
                return;
            }
            let Some(callee) = node.get("expression") else { return };
            if !callee.is(NodeKind::MemberAccess) || callee.member_name() != Some("transferFrom") {
                return;
            }
            let Some(first_arg) = node.get_array("arguments").into_iter().next() else { return };
            if first_arg.is(NodeKind::Identifier) {
                if let Some(name) = first_arg.name() {
                    if walk_ctx.params.contains(name) {
                        findings.push(RawFinding::at(ctx.line_index.line_from_src(node.src())));
                    }
                }
            }
        });
        findings
    }
}
