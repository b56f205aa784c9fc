use super::{AstNode, NodeKind};
use serde_json::Value;

/// Implicit context threaded through the DFS, per spec §4.3 / DESIGN NOTES: explicit arguments,
/// never ambient mutable state.
#[derive(Debug, Clone, Default)]
pub struct WalkCtx {
    /// The enclosing `FunctionDefinition`'s parameter names; empty outside any function.
    pub params: std::collections::HashSet<String>,
    /// Whether the walker is currently inside a `For`/`While`/`DoWhile` body.
    pub in_loop: bool,
}

/// Depth-first walk over the AST tree rooted at `root`, invoking `visit` once per node with the
/// context in effect at that node.
///
/// Child recursion generically traverses every nested JSON object/array value — solc's AST is a
/// plain tree, so this already visits each child exactly once without a hand-maintained list of
/// child-slot names.
pub fn walk<'a>(root: &'a Value, visit: &mut impl FnMut(AstNode<'a>, &WalkCtx)) {
    walk_with_ctx(root, WalkCtx::default(), visit);
}

fn walk_with_ctx<'a>(
    value: &'a Value,
    ctx: WalkCtx,
    visit: &mut impl FnMut(AstNode<'a>, &WalkCtx),
) {
    match value {
        Value::Object(map) => {
            if map.contains_key("nodeType") {
                let node = AstNode::new(value);
                visit(node.clone(), &ctx);

                let mut child_ctx = ctx.clone();
                match node.kind() {
                    NodeKind::FunctionDefinition => {
                        child_ctx.params = node.function_parameter_names();
                    }
                    NodeKind::WhileStatement | NodeKind::ForStatement | NodeKind::DoWhileStatement => {
                        child_ctx.in_loop = true;
                    }
                    _ => {}
                }
                for v in map.values() {
                    walk_with_ctx(v, child_ctx.clone(), visit);
                }
            } else {
                for v in map.values() {
                    walk_with_ctx(v, ctx.clone(), visit);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_with_ctx(item, ctx.clone(), visit);
            }
        }
        _ => {}
    }
}
