use crate::ast::walker::walk;
use crate::ast::NodeKind;
use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};

/// Flags `msg.value` read from inside a loop body — each iteration re-reads the same fixed
/// value sent with the transaction, a common source of double-counting bugs.
pub struct MsgValueLoop;

impl Detector for MsgValueLoop {
    fn id(&self) -> &'static str {
        "msg-value-loop"
    }

    fn description(&self) -> &'static str {
        "msg.value is read inside a loop, where it does not change between iterations"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn fix_suggestion(&self) -> &'static str {
        "Read msg.value once outside the loop and operate on a local copy."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        let Some(ast) = &ctx.ast else { return Vec::new() };
        let mut findings = Vec::new();
        walk(ast, &mut |node, walk_ctx| {
            if !walk_ctx.in_loop {
                return;
            }
            if node.is(NodeKind::MemberAccess) && node.member_name() == Some("value") {
                if let Some(expr) = node.get("expression") {
                    if expr.is(NodeKind::Identifier) && expr.name() == Some("msg") {
                        findings.push(RawFinding::at(ctx.line_index.line_from_src(node.src())));
                    }
                }
            }
        });
        findings
    }
}
