use super::{CallMethod, FunctionIr, Instruction, SendMethod, TEXT_FALLBACK_STATE_TOKENS};

/// Text-only fallback IR, used when no compiler AST is available. Walks lines, maintaining a
/// single synthetic function (`FUNC` named `""`), and emits a strictly under-approximating
/// instruction stream. Mirrors `SCAIRBuilder.build_from_text` line-for-line.
pub fn build(content: &str) -> Vec<FunctionIr> {
    let mut instructions = vec![Instruction::Func { name: String::new(), line: 1 }];

    for (i, raw_line) in content.split('\n').enumerate() {
        let line_no = i + 1;
        let line = raw_line.trim();

        if line.contains("require(") {
            instructions.push(Instruction::Require { line: line_no });
        }

        if line.contains(".call{") || line.contains(".call(") {
            let checked = line.contains('=');
            instructions.push(Instruction::ExternalCall {
                method: CallMethod::Call,
                line: line_no,
                checked,
            });
        }

        if line.contains(".send(") {
            let checked = line.contains('=');
            instructions.push(Instruction::Send { method: SendMethod::Send, line: line_no, checked });
        }

        if line.contains(".transfer(") || line.contains("transfer(") {
            instructions.push(Instruction::Send {
                method: SendMethod::Transfer,
                line: line_no,
                checked: true,
            });
        }

        if line.contains('=') && TEXT_FALLBACK_STATE_TOKENS.iter().any(|t| line.contains(t)) {
            instructions.push(Instruction::StateWrite { var: "unknown".to_owned(), line: line_no });
        }
    }

    vec![FunctionIr { name: String::new(), modifiers: Vec::new(), instructions }]
}
