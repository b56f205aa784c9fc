use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};

/// `SWC-104-IR`: for each `EXTERNAL_CALL`/`SEND` with `checked=false`, excluding
/// `method == "transfer"` (which reverts on failure and so needs no check), emits a finding.
pub struct UncheckedReturnIr;

impl Detector for UncheckedReturnIr {
    fn id(&self) -> &'static str {
        "SWC-104-IR"
    }

    fn description(&self) -> &'static str {
        "Return value of a low-level call or send is not checked"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn swc_id(&self) -> Option<&'static str> {
        Some("SWC-104")
    }

    fn fix_suggestion(&self) -> &'static str {
        "Check the boolean return value of low-level `call`/`send` and revert or handle failure explicitly."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        ctx.ir
            .iter()
            .flat_map(|f| &f.instructions)
            .filter(|i| i.is_external_call_or_send())
            .filter(|i| i.method() != Some("transfer"))
            .filter(|i| i.checked() == Some(false))
            .map(|i| RawFinding::at(i.line()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_ctx;
    use serde_json::json;

    fn function_ast(stmt: serde_json::Value) -> serde_json::Value {
        json!({
            "nodeType": "SourceUnit",
            "nodes": [{
                "nodeType": "ContractDefinition",
                "name": "S",
                "nodes": [{
                    "nodeType": "FunctionDefinition",
                    "name": "f",
                    "kind": "function",
                    "src": "37:51:0",
                    "body": { "nodeType": "Block", "statements": [stmt] }
                }]
            }]
        })
    }

    /// Spec §8 scenario 2: a bare `a.send(1);` is flagged as `swc_id="SWC-104"`.
    #[test]
    fn flags_discarded_send() {
        let content = "pragma solidity ^0.7.0;\ncontract S { function f(address payable a) public { a.send(1); } }\n";
        let stmt = json!({
            "nodeType": "ExpressionStatement",
            "expression": {
                "nodeType": "FunctionCall",
                "src": "76:9:0",
                "expression": {
                    "nodeType": "MemberAccess",
                    "memberName": "send",
                    "expression": { "nodeType": "Identifier", "name": "a" }
                }
            }
        });

        let ctx = test_ctx(content, Some(function_ast(stmt)));
        let findings = UncheckedReturnIr.run(&ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 3);
        assert_eq!(UncheckedReturnIr.swc_id(), Some("SWC-104"));
    }

    /// A rewritten `bool ok = a.send(1);` binds the return value, so it is not flagged.
    #[test]
    fn bound_send_is_not_flagged() {
        let content = "pragma solidity ^0.7.0;\ncontract S { function f(address payable a) public { bool ok = a.send(1); } }\n";
        let stmt = json!({
            "nodeType": "VariableDeclarationStatement",
            "src": "76:20:0",
            "declarations": [],
            "initialValue": {
                "nodeType": "FunctionCall",
                "src": "86:9:0",
                "expression": {
                    "nodeType": "MemberAccess",
                    "memberName": "send",
                    "expression": { "nodeType": "Identifier", "name": "a" }
                }
            }
        });

        let ctx = test_ctx(content, Some(function_ast(stmt)));
        assert!(UncheckedReturnIr.run(&ctx).is_empty());
    }
}
