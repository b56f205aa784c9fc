use crate::ast::walker::walk;
use crate::ast::NodeKind;
use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};
use serde_json::Value;

/// `SWC-108`: a state variable explicitly declared `public`, informational since public
/// visibility is sometimes exactly what's wanted but deserves a second look for sensitive data.
pub struct PublicStateVisibility;

impl Detector for PublicStateVisibility {
    fn id(&self) -> &'static str {
        "SWC-108"
    }

    fn description(&self) -> &'static str {
        "State variable is explicitly declared public"
    }

    fn severity(&self) -> Severity {
        Severity::Informational
    }

    fn fix_suggestion(&self) -> &'static str {
        "Confirm the state variable should be publicly readable; if it holds sensitive data, narrow its visibility and expose a controlled getter instead."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        let Some(ast) = &ctx.ast else { return Vec::new() };
        let mut findings = Vec::new();
        walk(ast, &mut |node, _| {
            if node.is(NodeKind::VariableDeclaration)
                && node.get_bool("stateVariable")
                && node.value.get("visibility").and_then(Value::as_str) == Some("public")
            {
                findings.push(RawFinding::at(ctx.line_index.line_from_src(node.src())));
            }
        });
        findings
    }
}
