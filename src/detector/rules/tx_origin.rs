use crate::ast::walker::walk;
use crate::ast::NodeKind;
use crate::context::AnalysisContext;
use crate::detector::{Detector, RawFinding, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

static TX_ORIGIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btx\.origin\b").unwrap());

/// `SWC-115`: any `tx.origin` read. AST-driven when available (`MemberAccess(member="origin",
/// expression=Identifier("tx"))`); falls back to a literal text scan outside comments.
pub struct TxOrigin;

impl Detector for TxOrigin {
    fn id(&self) -> &'static str {
        "SWC-115"
    }

    fn description(&self) -> &'static str {
        "Use of tx.origin for authorization is vulnerable to phishing via an intermediate contract"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn fix_suggestion(&self) -> &'static str {
        "Use msg.sender instead of tx.origin for authorization checks."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding> {
        if let Some(ast) = &ctx.ast {
            let mut findings = Vec::new();
            walk(ast, &mut |node, _walk_ctx| {
                if node.is(NodeKind::MemberAccess) && node.member_name() == Some("origin") {
                    if let Some(expr) = node.get("expression") {
                        if expr.is(NodeKind::Identifier) && expr.name() == Some("tx") {
                            findings.push(RawFinding::at(ctx.line_index.line_from_src(node.src())));
                        }
                    }
                }
            });
            return findings;
        }

        super::for_each_comment_stripped_line(ctx, |line_no, text| {
            TX_ORIGIN_RE.is_match(text).then(|| RawFinding::at(line_no))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_ctx;
    use serde_json::json;

    /// Spec §8 scenario 3: `tx.origin == msg.sender` is flagged as `swc_id="SWC-115"`.
    #[test]
    fn flags_tx_origin_comparison() {
        let content = "contract T { function g() public view returns (bool) { return tx.origin == msg.sender; } }\n";
        let ast = json!({
            "nodeType": "SourceUnit",
            "nodes": [{
                "nodeType": "ContractDefinition",
                "name": "T",
                "nodes": [{
                    "nodeType": "FunctionDefinition",
                    "name": "g",
                    "kind": "function",
                    "src": "13:75:0",
                    "body": {
                        "nodeType": "Block",
                        "statements": [{
                            "nodeType": "Return",
                            "expression": {
                                "nodeType": "BinaryOperation",
                                "operator": "==",
                                "leftExpression": {
                                    "nodeType": "MemberAccess",
                                    "memberName": "origin",
                                    "src": "62:9:0",
                                    "expression": { "nodeType": "Identifier", "name": "tx" }
                                },
                                "rightExpression": {
                                    "nodeType": "MemberAccess",
                                    "memberName": "sender",
                                    "expression": { "nodeType": "Identifier", "name": "msg" }
                                }
                            }
                        }]
                    }
                }]
            }]
        });

        let ctx = test_ctx(content, Some(ast));
        let findings = TxOrigin.run(&ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 1);
        assert_eq!(TxOrigin.swc_id(), Some("SWC-115"));
    }

    #[test]
    fn text_fallback_still_matches_when_no_ast() {
        let ctx = test_ctx("function g() public { return tx.origin == msg.sender; }\n", None);
        assert_eq!(TxOrigin.run(&ctx).len(), 1);
    }
}
