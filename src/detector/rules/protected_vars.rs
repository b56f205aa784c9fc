use crate::ast::walker::walk;
use crate::ast::{AstNode, NodeKind};
use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};
use serde_json::Value;

const PROTECTED_MODIFIERS: [&str; 4] = ["onlyOwner", "ownerOnly", "onlyAdmin", "admin"];

/// A function writes to state but carries neither a known access-control modifier nor an
/// inline `require(msg.sender == owner)` guard.
pub struct ProtectedVars;

impl Detector for ProtectedVars {
    fn id(&self) -> &'static str {
        "SLITHER-like-protected-vars"
    }

    fn description(&self) -> &'static str {
        "Function writes to state with no visible owner guard"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn fix_suggestion(&self) -> &'static str {
        "Guard state-changing functions with an owner or role modifier (e.g. onlyOwner), or an inline require(msg.sender == owner)."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        let Some(ast) = &ctx.ast else { return Vec::new() };

        let write_lines: std::collections::HashMap<&str, usize> = ctx
            .ir
            .iter()
            .filter_map(|f| {
                f.instructions.iter().find(|i| i.is_state_write()).map(|i| (f.name.as_str(), i.line()))
            })
            .collect();
        if write_lines.is_empty() {
            return Vec::new();
        }

        let mut findings = Vec::new();
        walk(ast, &mut |node, _| {
            if !node.is(NodeKind::FunctionDefinition) {
                return;
            }
            let Some(name) = node.name() else { return };
            let Some(&line) = write_lines.get(name) else { return };

            let mods: Vec<String> = node.modifier_names();
            if PROTECTED_MODIFIERS.iter().any(|p| mods.iter().any(|m| m == p)) {
                return;
            }
            if let Some(body) = node.get("body") {
                if has_owner_require(&body) {
                    return;
                }
            }
            findings.push(RawFinding::at(line));
        });
        findings
    }
}

/// Walks a function body looking for `require(msg.sender == owner)` (either operand order).
fn has_owner_require(node: &AstNode<'_>) -> bool {
    if node.is(NodeKind::FunctionCall) {
        let callee_is_require =
            node.get("expression").and_then(|e| e.name().map(ToOwned::to_owned)).as_deref() == Some("require");
        if callee_is_require {
            if let Some(first_arg) = node.get_array("arguments").into_iter().next() {
                if is_owner_check(&first_arg) {
                    return true;
                }
            }
        }
    }
    if let Value::Object(map) = node.value {
        for v in map.values() {
            if walk_value_for_owner_require(v) {
                return true;
            }
        }
    }
    false
}

fn walk_value_for_owner_require(value: &Value) -> bool {
    match value {
        Value::Object(_) => has_owner_require(&AstNode::new(value)),
        Value::Array(items) => items.iter().any(walk_value_for_owner_require),
        _ => false,
    }
}

fn is_owner_check(node: &AstNode<'_>) -> bool {
    if !node.is(NodeKind::BinaryOperation) {
        return false;
    }
    if node.value.get("operator").and_then(Value::as_str) != Some("==") {
        return false;
    }
    let left = node.get("leftExpression");
    let right = node.get("rightExpression");
    let is_msg_sender = |n: &Option<AstNode<'_>>| {
        n.as_ref().is_some_and(|n| {
            n.is(NodeKind::MemberAccess)
                && n.member_name() == Some("sender")
                && n.get("expression").and_then(|e| e.name().map(ToOwned::to_owned)).as_deref() == Some("msg")
        })
    };
    let is_owner_ident =
        |n: &Option<AstNode<'_>>| n.as_ref().is_some_and(|n| n.is(NodeKind::Identifier) && n.name() == Some("owner"));

    (is_msg_sender(&left) && is_owner_ident(&right)) || (is_msg_sender(&right) && is_owner_ident(&left))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_ctx;
    use serde_json::json;

    fn contract_ast(modifiers: serde_json::Value, statements: serde_json::Value) -> serde_json::Value {
        json!({
            "nodeType": "SourceUnit",
            "nodes": [{
                "nodeType": "ContractDefinition",
                "name": "P",
                "nodes": [
                    { "nodeType": "VariableDeclaration", "name": "owner", "stateVariable": true },
                    { "nodeType": "VariableDeclaration", "name": "v", "stateVariable": true },
                    {
                        "nodeType": "FunctionDefinition",
                        "name": "set",
                        "kind": "function",
                        "src": "38:70:0",
                        "parameters": { "parameters": [{ "nodeType": "VariableDeclaration", "name": "x" }] },
                        "modifiers": modifiers,
                        "body": { "nodeType": "Block", "statements": statements }
                    }
                ]
            }]
        })
    }

    /// Spec §8 scenario 6: an inline `require(msg.sender == owner)` guard suppresses the
    /// finding even with no access-control modifier.
    #[test]
    fn inline_owner_require_suppresses_finding() {
        let content = "contract P { address owner; uint v;\n  function set(uint x) public { require(msg.sender == owner); v = x; } }\n";
        let statements = json!([
            {
                "nodeType": "ExpressionStatement",
                "src": "68:29:0",
                "expression": {
                    "nodeType": "FunctionCall",
                    "src": "68:29:0",
                    "expression": { "nodeType": "Identifier", "name": "require" },
                    "arguments": [{
                        "nodeType": "BinaryOperation",
                        "operator": "==",
                        "leftExpression": {
                            "nodeType": "MemberAccess",
                            "memberName": "sender",
                            "expression": { "nodeType": "Identifier", "name": "msg" }
                        },
                        "rightExpression": { "nodeType": "Identifier", "name": "owner" }
                    }]
                }
            },
            {
                "nodeType": "ExpressionStatement",
                "expression": {
                    "nodeType": "Assignment",
                    "src": "98:6:0",
                    "leftHandSide": { "nodeType": "Identifier", "name": "v" },
                    "rightHandSide": { "nodeType": "Identifier", "name": "x" }
                }
            }
        ]);

        let ctx = test_ctx(content, Some(contract_ast(json!([]), statements)));
        assert!(ProtectedVars.run(&ctx).is_empty());
    }

    #[test]
    fn unguarded_state_write_is_flagged() {
        let content = "contract P { address owner; uint v;\n  function set(uint x) public { v = x; } }\n";
        let statements = json!([{
            "nodeType": "ExpressionStatement",
            "expression": {
                "nodeType": "Assignment",
                "src": "68:6:0",
                "leftHandSide": { "nodeType": "Identifier", "name": "v" },
                "rightHandSide": { "nodeType": "Identifier", "name": "x" }
            }
        }]);

        let ctx = test_ctx(content, Some(contract_ast(json!([]), statements)));
        let findings = ProtectedVars.run(&ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 2);
    }

    #[test]
    fn only_owner_modifier_suppresses_finding() {
        let content = "contract P { address owner; uint v;\n  function set(uint x) public onlyOwner { v = x; } }\n";
        let statements = json!([{
            "nodeType": "ExpressionStatement",
            "expression": {
                "nodeType": "Assignment",
                "src": "78:6:0",
                "leftHandSide": { "nodeType": "Identifier", "name": "v" },
                "rightHandSide": { "nodeType": "Identifier", "name": "x" }
            }
        }]);
        let modifiers = json!([{ "modifierName": { "nodeType": "Identifier", "name": "onlyOwner" } }]);

        let ctx = test_ctx(content, Some(contract_ast(modifiers, statements)));
        assert!(ProtectedVars.run(&ctx).is_empty());
    }
}
