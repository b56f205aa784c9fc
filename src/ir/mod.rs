//! SCA-IR: a per-function linear instruction stream distilled from the AST, or, failing that,
//! from raw source text. See spec §3/§4.4.

pub mod from_ast;
pub mod from_text;

use serde::{Deserialize, Serialize};

/// Hard-coded text-fallback `STATE_WRITE` heuristic token list. Per DESIGN NOTES, its intended
/// extension policy is an open question left to maintainers; this crate keeps the original
/// two-token list rather than inventing a configurable one.
pub const TEXT_FALLBACK_STATE_TOKENS: [&str; 2] = ["balance", "owner"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallMethod {
    Call,
    Delegatecall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendMethod {
    Send,
    Transfer,
}

/// One SCA-IR opcode. The closed set defined in spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Instruction {
    #[serde(rename = "FUNC")]
    Func { name: String, line: usize },
    #[serde(rename = "REQUIRE")]
    Require { line: usize },
    #[serde(rename = "EXTERNAL_CALL")]
    ExternalCall { method: CallMethod, line: usize, checked: bool },
    #[serde(rename = "SEND")]
    Send { method: SendMethod, line: usize, checked: bool },
    #[serde(rename = "STATE_WRITE")]
    StateWrite { var: String, line: usize },
    #[serde(rename = "STATE_DECL")]
    StateDecl { var: String, line: usize },
    #[serde(rename = "IF")]
    If { line: usize },
    #[serde(rename = "LOOP")]
    Loop { line: usize },
    #[serde(rename = "RETURN")]
    Return { line: usize },
    #[serde(rename = "SELFDESTRUCT")]
    Selfdestruct { line: usize },
}

impl Instruction {
    pub fn line(&self) -> usize {
        match self {
            Instruction::Func { line, .. }
            | Instruction::Require { line }
            | Instruction::ExternalCall { line, .. }
            | Instruction::Send { line, .. }
            | Instruction::StateWrite { line, .. }
            | Instruction::StateDecl { line, .. }
            | Instruction::If { line }
            | Instruction::Loop { line }
            | Instruction::Return { line }
            | Instruction::Selfdestruct { line } => *line,
        }
    }

    pub fn is_external_call_or_send(&self) -> bool {
        matches!(self, Instruction::ExternalCall { .. } | Instruction::Send { .. })
    }

    pub fn is_state_write(&self) -> bool {
        matches!(self, Instruction::StateWrite { .. })
    }

    pub fn checked(&self) -> Option<bool> {
        match self {
            Instruction::ExternalCall { checked, .. } | Instruction::Send { checked, .. } => {
                Some(*checked)
            }
            _ => None,
        }
    }

    /// `"call"` / `"delegatecall"` / `"send"` / `"transfer"`, for detectors keying on method.
    pub fn method(&self) -> Option<&'static str> {
        match self {
            Instruction::ExternalCall { method: CallMethod::Call, .. } => Some("call"),
            Instruction::ExternalCall { method: CallMethod::Delegatecall, .. } => {
                Some("delegatecall")
            }
            Instruction::Send { method: SendMethod::Send, .. } => Some("send"),
            Instruction::Send { method: SendMethod::Transfer, .. } => Some("transfer"),
            _ => None,
        }
    }
}

/// One function's IR record: declared modifier names plus its ordered instruction list.
/// `FUNC` is always instruction 0 (spec §3 invariant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionIr {
    pub name: String,
    pub modifiers: Vec<String>,
    pub instructions: Vec<Instruction>,
}

impl FunctionIr {
    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m == name)
    }

    pub fn has_any_modifier(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.has_modifier(n))
    }
}

/// The whole file's SCA-IR: functions in declaration order (constructor denoted `"constructor"`).
pub type Ir = Vec<FunctionIr>;
