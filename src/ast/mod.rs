//! Tagged-sum AST node model over solc's `--standard-json` AST output.
//!
//! Node kinds are recognized by `nodeType` (spec's data model); anything the core does not
//! name falls back to [`NodeKind::Other`] so that an upstream compiler's evolving JSON schema
//! never hard-fails parsing (DESIGN NOTES: "unknown node kinds must be ignored gracefully").

pub mod walker;

use serde_json::Value;

/// A decoded `src` span: `offset:length:fileIdx`, all byte counts into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Src {
    pub offset: usize,
    pub length: usize,
    pub file_idx: i64,
}

impl Src {
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(':');
        let offset = parts.next()?.parse().ok()?;
        let length = parts.next()?.parse().ok()?;
        let file_idx = parts.next().unwrap_or("-1").parse().unwrap_or(-1);
        Some(Self { offset, length, file_idx })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    ContractDefinition,
    FunctionDefinition,
    VariableDeclaration,
    Block,
    ExpressionStatement,
    IfStatement,
    WhileStatement,
    ForStatement,
    DoWhileStatement,
    Return,
    VariableDeclarationStatement,
    Assignment,
    FunctionCall,
    MemberAccess,
    Identifier,
    BinaryOperation,
    Other,
}

impl NodeKind {
    fn from_node_type(nt: &str) -> Self {
        match nt {
            "ContractDefinition" => Self::ContractDefinition,
            "FunctionDefinition" => Self::FunctionDefinition,
            "VariableDeclaration" => Self::VariableDeclaration,
            "Block" => Self::Block,
            "ExpressionStatement" => Self::ExpressionStatement,
            "IfStatement" => Self::IfStatement,
            "WhileStatement" => Self::WhileStatement,
            "ForStatement" => Self::ForStatement,
            "DoWhileStatement" => Self::DoWhileStatement,
            "Return" => Self::Return,
            "VariableDeclarationStatement" => Self::VariableDeclarationStatement,
            "Assignment" => Self::Assignment,
            "FunctionCall" => Self::FunctionCall,
            "MemberAccess" => Self::MemberAccess,
            "Identifier" => Self::Identifier,
            "BinaryOperation" => Self::BinaryOperation,
            _ => Self::Other,
        }
    }
}

/// A thin, cheaply-cloneable view over one JSON object in the AST tree.
///
/// Solc's AST is a plain tree (no shared references), so a node's full child set is exactly
/// the JSON object/array values nested under it; there is no separate "child slot" registry to
/// maintain in Rust, unlike a hand-rolled struct-per-node model.
#[derive(Debug, Clone)]
pub struct AstNode<'a> {
    pub value: &'a Value,
}

impl<'a> AstNode<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn node_type(&self) -> Option<&'a str> {
        self.value.get("nodeType").and_then(Value::as_str)
    }

    pub fn kind(&self) -> NodeKind {
        self.node_type().map(NodeKind::from_node_type).unwrap_or(NodeKind::Other)
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind() == kind
    }

    pub fn src(&self) -> Option<Src> {
        self.value.get("src").and_then(Value::as_str).and_then(Src::parse)
    }

    pub fn name(&self) -> Option<&'a str> {
        self.value.get("name").and_then(Value::as_str)
    }

    pub fn member_name(&self) -> Option<&'a str> {
        self.value.get("memberName").and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.value.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get(&self, key: &str) -> Option<AstNode<'a>> {
        self.value.get(key).filter(|v| !v.is_null()).map(AstNode::new)
    }

    pub fn get_array(&self, key: &str) -> Vec<AstNode<'a>> {
        self.value
            .get(key)
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(AstNode::new).collect())
            .unwrap_or_default()
    }

    /// The parameter names of this `FunctionDefinition`'s parameter list.
    pub fn function_parameter_names(&self) -> std::collections::HashSet<String> {
        self.get("parameters")
            .map(|params| {
                params
                    .get_array("parameters")
                    .into_iter()
                    .filter_map(|p| p.name().map(ToOwned::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Modifier names invoked on a `FunctionDefinition`, by modifier identifier.
    pub fn modifier_names(&self) -> Vec<String> {
        self.get_array("modifiers")
            .into_iter()
            .filter_map(|m| m.get("modifierName").and_then(|mn| mn.name().map(ToOwned::to_owned)))
            .collect()
    }
}

/// Parses a `line = 1 + count_of('\n' in text[:offset])` position, backed by a prefix-sum
/// newline index built once per file (DESIGN NOTES: avoid O(offset) per call).
pub struct LineIndex {
    /// Byte offset of the start of each line; `newline_offsets[i]` is where line `i+2` begins.
    newline_offsets: Vec<usize>,
}

impl LineIndex {
    pub fn build(content: &str) -> Self {
        let newline_offsets =
            content.bytes().enumerate().filter(|(_, b)| *b == b'\n').map(|(i, _)| i).collect();
        Self { newline_offsets }
    }

    /// 1-based line number containing byte `offset`.
    pub fn line_at(&self, offset: usize) -> usize {
        // number of newlines strictly before `offset`, plus 1.
        self.newline_offsets.partition_point(|&nl| nl < offset) + 1
    }

    pub fn line_from_src(&self, src: Option<Src>) -> usize {
        src.map(|s| self.line_at(s.offset)).unwrap_or(0)
    }
}
