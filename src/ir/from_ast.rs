use super::{CallMethod, FunctionIr, Instruction, SendMethod};
use crate::ast::{AstNode, LineIndex, NodeKind};
use serde_json::Value;
use std::collections::HashSet;

/// Lowers an AST root into SCA-IR. Two passes: collect state-variable names, then emit one
/// `FunctionIr` per `FunctionDefinition` found anywhere under `root`. Mirrors
/// `SCAIRBuilder.build` field-for-field.
pub fn build(root: &Value, lines: &LineIndex) -> Vec<FunctionIr> {
    let root_node = AstNode::new(root);

    let mut state_vars = HashSet::new();
    for_each_node(&root_node, &mut |node| {
        if node.is(NodeKind::VariableDeclaration) && node.get_bool("stateVariable") {
            if let Some(name) = node.name() {
                state_vars.insert(name.to_owned());
            }
        }
    });

    let mut functions = Vec::new();
    for_each_node(&root_node, &mut |node| {
        if node.is(NodeKind::FunctionDefinition) {
            let kind = node.value.get("kind").and_then(Value::as_str);
            if kind.is_none() || matches!(kind, Some("function") | Some("constructor")) {
                let mut name = node.name().unwrap_or_default().to_owned();
                if name.is_empty() && kind == Some("constructor") {
                    name = "constructor".to_owned();
                }
                let modifiers = node.modifier_names();
                let mut instructions =
                    vec![Instruction::Func { name: name.clone(), line: lines.line_from_src(node.src()) }];
                if let Some(body) = node.get("body") {
                    emit_block(&body, &state_vars, lines, &mut instructions);
                }
                functions.push(FunctionIr { name, modifiers, instructions });
            }
        }
    });
    functions
}

/// Visits every `nodeType`-bearing object anywhere under `node`, recursively, depth-first.
/// Solc's AST is a plain tree, so this already visits each node exactly once.
fn for_each_node<'a>(node: &AstNode<'a>, f: &mut impl FnMut(AstNode<'a>)) {
    visit_value(node.value, f);
}

fn visit_value<'a>(value: &'a Value, f: &mut impl FnMut(AstNode<'a>)) {
    match value {
        Value::Object(map) => {
            if map.contains_key("nodeType") {
                f(AstNode::new(value));
            }
            for v in map.values() {
                visit_value(v, f);
            }
        }
        Value::Array(items) => {
            for item in items {
                visit_value(item, f);
            }
        }
        _ => {}
    }
}

fn emit_block(block: &AstNode<'_>, state_vars: &HashSet<String>, lines: &LineIndex, instr: &mut Vec<Instruction>) {
    for st in block.get_array("statements") {
        emit_statement(&st, state_vars, lines, instr);
    }
}

fn emit_statement(
    st: &AstNode<'_>,
    state_vars: &HashSet<String>,
    lines: &LineIndex,
    instr: &mut Vec<Instruction>,
) {
    match st.kind() {
        NodeKind::ExpressionStatement => {
            if let Some(expr) = st.get("expression") {
                emit_expression(&expr, state_vars, lines, instr);
            }
        }
        NodeKind::IfStatement => {
            instr.push(Instruction::If { line: lines.line_from_src(st.src()) });
            if let Some(then) = st.get("trueBody") {
                emit_block(&then, state_vars, lines, instr);
            }
            if let Some(elseb) = st.get("falseBody") {
                emit_block(&elseb, state_vars, lines, instr);
            }
        }
        NodeKind::Return => {
            instr.push(Instruction::Return { line: lines.line_from_src(st.src()) });
        }
        NodeKind::VariableDeclarationStatement => {
            if let Some(init) = st.get("initialValue") {
                if init.is(NodeKind::FunctionCall) {
                    if let Some(callee) = init.get("expression") {
                        if callee.is(NodeKind::MemberAccess) {
                            if let Some(mn) = callee.member_name() {
                                let line = lines.line_from_src(init.src());
                                match mn {
                                    "call" => instr.push(Instruction::ExternalCall {
                                        method: CallMethod::Call,
                                        line,
                                        checked: true,
                                    }),
                                    "send" => instr.push(Instruction::Send {
                                        method: SendMethod::Send,
                                        line,
                                        checked: true,
                                    }),
                                    _ => {}
                                }
                            }
                        }
                    }
                }
            }
            for d in st.get_array("declarations") {
                if let Some(name) = d.name() {
                    if state_vars.contains(name) {
                        instr.push(Instruction::StateDecl {
                            var: name.to_owned(),
                            line: lines.line_from_src(st.src()),
                        });
                    }
                }
            }
        }
        NodeKind::WhileStatement | NodeKind::ForStatement => {
            instr.push(Instruction::Loop { line: lines.line_from_src(st.src()) });
        }
        _ => {}
    }
}

fn emit_expression(
    expr: &AstNode<'_>,
    state_vars: &HashSet<String>,
    lines: &LineIndex,
    instr: &mut Vec<Instruction>,
) {
    match expr.kind() {
        NodeKind::FunctionCall => {
            if let Some(callee) = expr.get("expression") {
                if let Some(cname) = callee.name() {
                    if cname == "require" {
                        instr.push(Instruction::Require { line: lines.line_from_src(expr.src()) });
                        return;
                    }
                    if cname == "selfdestruct" {
                        instr.push(Instruction::Selfdestruct { line: lines.line_from_src(expr.src()) });
                        return;
                    }
                }
                if callee.is(NodeKind::MemberAccess) {
                    if let Some(mn) = callee.member_name() {
                        let line = lines.line_from_src(expr.src());
                        match mn {
                            "call" => {
                                instr.push(Instruction::ExternalCall {
                                    method: CallMethod::Call,
                                    line,
                                    checked: false,
                                });
                                return;
                            }
                            "delegatecall" => {
                                instr.push(Instruction::ExternalCall {
                                    method: CallMethod::Delegatecall,
                                    line,
                                    checked: false,
                                });
                                return;
                            }
                            "send" => {
                                instr.push(Instruction::Send {
                                    method: SendMethod::Send,
                                    line,
                                    checked: false,
                                });
                                return;
                            }
                            "transfer" => {
                                instr.push(Instruction::Send {
                                    method: SendMethod::Transfer,
                                    line,
                                    checked: true,
                                });
                                return;
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
        NodeKind::Assignment => {
            if let Some(lhs) = expr.get("leftHandSide") {
                if let Some(varname) = lvalue_root_name(&lhs) {
                    if state_vars.contains(varname) {
                        instr.push(Instruction::StateWrite {
                            var: varname.to_owned(),
                            line: lines.line_from_src(expr.src()),
                        });
                    }
                }
            }
            if let Some(rhs) = expr.get("rightHandSide") {
                if rhs.is(NodeKind::FunctionCall) {
                    if let Some(callee) = rhs.get("expression") {
                        if callee.is(NodeKind::MemberAccess) {
                            if let Some(mn) = callee.member_name() {
                                let line = lines.line_from_src(rhs.src());
                                match mn {
                                    "call" => instr.push(Instruction::ExternalCall {
                                        method: CallMethod::Call,
                                        line,
                                        checked: true,
                                    }),
                                    "send" => instr.push(Instruction::Send {
                                        method: SendMethod::Send,
                                        line,
                                        checked: true,
                                    }),
                                    _ => {}
                                }
                            }
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

/// The state variable an lvalue ultimately writes through, resolving index/member access chains
/// down to their base identifier (`bal[msg.sender]` and `s.field` both resolve to their root
/// name) rather than only recognizing a bare `Identifier` lvalue.
fn lvalue_root_name<'a>(node: &AstNode<'a>) -> Option<&'a str> {
    match node.node_type() {
        Some("Identifier") => node.name(),
        Some("IndexAccess") => node.get("baseExpression").and_then(|b| lvalue_root_name(&b)),
        Some("MemberAccess") => node.get("expression").and_then(|b| lvalue_root_name(&b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn index_access_lvalue_resolves_to_state_write() {
        let ast = json!({
            "nodeType": "ContractDefinition",
            "nodes": [
                { "nodeType": "VariableDeclaration", "name": "bal", "stateVariable": true },
                {
                    "nodeType": "FunctionDefinition",
                    "name": "w",
                    "kind": "function",
                    "src": "0:1:0",
                    "body": {
                        "nodeType": "Block",
                        "statements": [{
                            "nodeType": "ExpressionStatement",
                            "expression": {
                                "nodeType": "Assignment",
                                "src": "10:5:0",
                                "leftHandSide": {
                                    "nodeType": "IndexAccess",
                                    "baseExpression": { "nodeType": "Identifier", "name": "bal" }
                                },
                                "rightHandSide": { "nodeType": "Literal" }
                            }
                        }]
                    }
                }
            ]
        });
        let lines = LineIndex::build("x\n");
        let ir = build(&ast, &lines);
        assert!(ir[0].instructions.iter().any(|i| i.is_state_write()));
    }

    #[test]
    fn external_call_discarded_is_unchecked() {
        let ast = json!({
            "nodeType": "ContractDefinition",
            "nodes": [{
                "nodeType": "FunctionDefinition",
                "name": "w",
                "kind": "function",
                "modifiers": [],
                "src": "0:1:0",
                "body": {
                    "nodeType": "Block",
                    "statements": [{
                        "nodeType": "ExpressionStatement",
                        "expression": {
                            "nodeType": "FunctionCall",
                            "src": "10:5:0",
                            "expression": { "nodeType": "MemberAccess", "memberName": "call" }
                        }
                    }]
                }
            }]
        });
        let lines = LineIndex::build("x\n");
        let ir = build(&ast, &lines);
        assert_eq!(ir.len(), 1);
        let call = ir[0].instructions.iter().find(|i| i.is_external_call_or_send()).unwrap();
        assert_eq!(call.checked(), Some(false));
    }

    #[test]
    fn bound_external_call_is_checked() {
        let ast = json!({
            "nodeType": "ContractDefinition",
            "nodes": [{
                "nodeType": "FunctionDefinition",
                "name": "w",
                "kind": "function",
                "src": "0:1:0",
                "body": {
                    "nodeType": "Block",
                    "statements": [{
                        "nodeType": "VariableDeclarationStatement",
                        "src": "10:5:0",
                        "declarations": [],
                        "initialValue": {
                            "nodeType": "FunctionCall",
                            "src": "10:5:0",
                            "expression": { "nodeType": "MemberAccess", "memberName": "send" }
                        }
                    }]
                }
            }]
        });
        let lines = LineIndex::build("x\n");
        let ir = build(&ast, &lines);
        let send = ir[0].instructions.iter().find(|i| i.is_external_call_or_send()).unwrap();
        assert_eq!(send.checked(), Some(true));
    }
}
