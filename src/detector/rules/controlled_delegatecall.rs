use crate::ast::walker::walk;
use crate::ast::NodeKind;
use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};

/// Flags `x.delegatecall(...)` where `x` is a direct function-parameter identifier — a
/// caller-controlled delegatecall target.
pub struct ControlledDelegatecall;

impl Detector for ControlledDelegatecall {
    fn id(&self) -> &'static str {
        "controlled-delegatecall"
    }

    fn description(&self) -> &'static str {
        "delegatecall target is a function parameter, letting a caller choose arbitrary code to execute in this contract's storage"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn fix_suggestion(&self) -> &'static str {
        "Never delegatecall to an address supplied directly by the caller; restrict the target to a fixed, trusted address."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        let Some(ast) = &ctx.ast else { return Vec::new() };
        let mut findings = Vec::new();
        walk(ast, &mut |node, walk_ctx| {
            if node.is(NodeKind::MemberAccess) && node.member_name() == Some("delegatecall") {
                if let Some(expr) = node.get("expression") {
                    if expr.is(NodeKind::Identifier) {
                        if let Some(name) = expr.name() {
                            if walk_ctx.params.contains(name) {
                                findings.push(RawFinding::at(ctx.line_index.line_from_src(node.src())));
                            }
                        }
                    }
                }
            }
        });
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_ctx;
    use serde_json::json;

    /// Spec §8 scenario 5: `x.delegatecall("")` where `x` is a function parameter.
    #[test]
    fn flags_delegatecall_on_parameter() {
        let content = "contract D { function f(address x) public { x.delegatecall(\"\"); } }\n";
        let ast = json!({
            "nodeType": "SourceUnit",
            "nodes": [{
                "nodeType": "ContractDefinition",
                "name": "D",
                "nodes": [{
                    "nodeType": "FunctionDefinition",
                    "name": "f",
                    "kind": "function",
                    "src": "13:52:0",
                    "parameters": { "parameters": [{ "nodeType": "VariableDeclaration", "name": "x" }] },
                    "body": {
                        "nodeType": "Block",
                        "statements": [{
                            "nodeType": "ExpressionStatement",
                            "expression": {
                                "nodeType": "FunctionCall",
                                "src": "44:18:0",
                                "expression": {
                                    "nodeType": "MemberAccess",
                                    "memberName": "delegatecall",
                                    "src": "44:18:0",
                                    "expression": { "nodeType": "Identifier", "name": "x" }
                                }
                            }
                        }]
                    }
                }]
            }]
        });

        let ctx = test_ctx(content, Some(ast));
        let findings = ControlledDelegatecall.run(&ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 1);
    }

    #[test]
    fn does_not_flag_delegatecall_on_non_parameter() {
        let content = "contract D { address trusted; function f() public { trusted.delegatecall(\"\"); } }\n";
        let ast = json!({
            "nodeType": "SourceUnit",
            "nodes": [{
                "nodeType": "ContractDefinition",
                "name": "D",
                "nodes": [{
                    "nodeType": "FunctionDefinition",
                    "name": "f",
                    "kind": "function",
                    "src": "0:1:0",
                    "parameters": { "parameters": [] },
                    "body": {
                        "nodeType": "Block",
                        "statements": [{
                            "nodeType": "ExpressionStatement",
                            "expression": {
                                "nodeType": "FunctionCall",
                                "src": "0:1:0",
                                "expression": {
                                    "nodeType": "MemberAccess",
                                    "memberName": "delegatecall",
                                    "expression": { "nodeType": "Identifier", "name": "trusted" }
                                }
                            }
                        }]
                    }
                }]
            }]
        });

        let ctx = test_ctx(content, Some(ast));
        assert!(ControlledDelegatecall.run(&ctx).is_empty());
    }
}
