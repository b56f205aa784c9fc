//! Contract/Function Attribution (spec §4.8): given a line number, find the innermost enclosing
//! contract and function by walking AST `src` spans, built once per file.

use crate::ast::walker::walk;
use crate::ast::{LineIndex, NodeKind};
use serde_json::Value;

#[derive(Debug, Clone)]
struct Range {
    name: String,
    start_line: usize,
    end_line: usize,
}

impl Range {
    fn len(&self) -> usize {
        self.end_line.saturating_sub(self.start_line)
    }

    fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

/// Precomputed contract and function line ranges for one file, queryable by line number.
pub struct Attribution {
    contracts: Vec<Range>,
    functions: Vec<Range>,
}

impl Attribution {
    pub fn build(ast: &Value, line_index: &LineIndex) -> Self {
        let mut contracts = Vec::new();
        let mut functions = Vec::new();
        walk(ast, &mut |node, _| {
            let Some(src) = node.src() else { return };
            let start_line = line_index.line_at(src.offset);
            let end_line = line_index.line_at(src.offset + src.length.saturating_sub(1));
            let name = node.name().unwrap_or_default().to_owned();
            match node.kind() {
                NodeKind::ContractDefinition => {
                    contracts.push(Range { name, start_line, end_line });
                }
                NodeKind::FunctionDefinition => {
                    let name = if name.is_empty() { "constructor".to_owned() } else { name };
                    functions.push(Range { name, start_line, end_line });
                }
                _ => {}
            }
        });
        Self { contracts, functions }
    }

    pub fn empty() -> Self {
        Self { contracts: Vec::new(), functions: Vec::new() }
    }

    /// Innermost contract and function names containing `line`, empty strings if none match.
    pub fn locate(&self, line: usize) -> (String, String) {
        let contract = innermost(&self.contracts, line).unwrap_or_default();
        let function = innermost(&self.functions, line).unwrap_or_default();
        (contract, function)
    }
}

fn innermost(ranges: &[Range], line: usize) -> Option<String> {
    ranges
        .iter()
        .filter(|r| r.contains(line))
        .min_by_key(|r| r.len())
        .map(|r| r.name.clone())
}
