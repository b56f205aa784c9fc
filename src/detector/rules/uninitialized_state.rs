use crate::ast::walker::walk;
use crate::ast::NodeKind;
use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};

/// Flags a state variable declared with no initializer — it starts at its type's zero value,
/// which is easy to mistake for an intentionally-set default.
pub struct UninitializedState;

impl Detector for UninitializedState {
    fn id(&self) -> &'static str {
        "SLITHER-like-uninitialized-state"
    }

    fn description(&self) -> &'static str {
        "State variable is declared without an initial value"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn fix_suggestion(&self) -> &'static str {
        "Give the state variable an explicit initial value, or confirm its zero value is intentional."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        let Some(ast) = &ctx.ast else { return Vec::new() };
        let mut findings = Vec::new();
        walk(ast, &mut |node, _| {
            if node.is(NodeKind::VariableDeclaration) && node.get_bool("stateVariable") && node.get("value").is_none() {
                findings.push(RawFinding::at(ctx.line_index.line_from_src(node.src())));
            }
        });
        findings
    }
}
