use crate::error::{ScaError, Result};
use std::path::{Path, PathBuf};

/// An immutable, UTF-8 decoded source file plus its 1-indexed line split.
///
/// Owns the text; nothing downstream (AST, IR) copies it, they only index into it by line/offset.
#[derive(Debug, Clone)]
pub struct SourceSnapshot {
    pub filename: PathBuf,
    pub content: String,
    /// 1-indexed: `lines[0]` is line 1. Split on `\n`; a final non-terminated line is preserved.
    pub lines: Vec<String>,
}

impl SourceSnapshot {
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ScaError::SourceIOError {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8(bytes)
            .map_err(|_| ScaError::InvalidUtf8 { path: path.to_path_buf() })?;
        Ok(Self::from_content(path.to_path_buf(), content))
    }

    pub fn from_content(filename: PathBuf, content: String) -> Self {
        let lines = content.split('\n').map(ToOwned::to_owned).collect();
        Self { filename, content, lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the 1-indexed line's text, if in range.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1).and_then(|idx| self.lines.get(idx)).map(String::as_str)
    }

    /// Up to two lines of context either side of `line`, clamped to file bounds, plus the
    /// resolved end line. Per spec §4.6 step 3 / §8 invariant (at most 5 lines).
    pub fn snippet(&self, line: usize) -> (String, usize) {
        let total = self.line_count();
        if total == 0 || line == 0 {
            return (String::new(), line);
        }
        let start = line.saturating_sub(2).max(1);
        let end = (line + 2).min(total);
        let snippet = (start..=end)
            .filter_map(|l| self.line(l))
            .collect::<Vec<_>>()
            .join("\n");
        (snippet, end)
    }
}
