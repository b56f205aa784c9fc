use crate::ast::{AstNode, LineIndex, NodeKind};
use crate::compiler;
use crate::config::AnalyzerConfig;
use crate::ir::{self, Ir};
use crate::source::SourceSnapshot;
use serde_json::Value;

/// Immutable bundle threaded into every detector call. Constructed once per file; never
/// mutated during detector execution (spec §4.5). `Send + Sync` so callers may analyze
/// independent files in parallel (spec §5).
pub struct AnalysisContext {
    pub source: SourceSnapshot,
    /// The compiler-produced AST root, when the compiler adapter succeeded.
    pub ast: Option<Value>,
    pub ir: Ir,
    pub line_index: LineIndex,
    /// The pragma-declared compiler version, if one could be extracted. `None` renders as
    /// `"unknown"` in the final report.
    pub solidity_version: Option<semver::Version>,
}

impl AnalysisContext {
    /// Builds a context for one source file: attempts compilation (C2), lowers the result into
    /// SCA-IR via whichever entry point succeeded (C4), and indexes line offsets once.
    pub fn build(source: SourceSnapshot, config: &AnalyzerConfig) -> Self {
        let line_index = LineIndex::build(&source.content);
        let attempt = compiler::try_parse(&source.content, config);

        let ir = match &attempt.ast {
            Some(root) => ir::from_ast::build(first_contract_or_root(root), &line_index),
            None => ir::from_text::build(&source.content),
        };

        Self { source, ast: attempt.ast, ir, line_index, solidity_version: attempt.solidity_version }
    }

    pub fn filename(&self) -> &str {
        self.source.filename.to_str().unwrap_or_default()
    }

    pub fn lines(&self) -> &[String] {
        &self.source.lines
    }

    pub fn content(&self) -> &str {
        &self.source.content
    }
}

/// Builds a context directly from a literal source string and (optionally) a hand-built AST
/// fixture, bypassing the compiler adapter entirely. Lets detector tests exercise the exact
/// spec §8 scenario fixtures without a `solc` binary, the same way `ir/from_ast.rs`'s own tests
/// feed it literal `serde_json::json!()` trees.
#[cfg(test)]
pub(crate) fn test_ctx(content: &str, ast: Option<Value>) -> AnalysisContext {
    let line_index = LineIndex::build(content);
    let ir = match &ast {
        Some(root) => ir::from_ast::build(first_contract_or_root(root), &line_index),
        None => ir::from_text::build(content),
    };
    AnalysisContext {
        source: SourceSnapshot::from_content("fixture.sol".into(), content.to_owned()),
        ast,
        ir,
        line_index,
        solidity_version: None,
    }
}

/// The first top-level `ContractDefinition` under a `SourceUnit`, per `ast_parser.py`'s choice
/// to thread only the first contract's node forward to the IR builder; falls back to `root`
/// itself if none is found so a bare contract-only fixture (no enclosing `SourceUnit`) still
/// works.
fn first_contract_or_root(root: &Value) -> &Value {
    AstNode::new(root)
        .get_array("nodes")
        .into_iter()
        .find(|node| node.is(NodeKind::ContractDefinition))
        .map(|node| node.value)
        .unwrap_or(root)
}
