//! Compiler Adapter (spec §4.2): locates or installs the solc version a file's pragma
//! declares, drives it to produce an AST, and degrades gracefully when that is impossible.

#[cfg(feature = "svm-solc")]
pub mod solc;

use crate::config::AnalyzerConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use semver::{Version, VersionReq};
use serde_json::Value;

static PRAGMA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"pragma\s+solidity\s+\^?(\d+\.\d+(?:\.\d+)?)").unwrap());

/// Extracts the first `pragma solidity` version literal, defaulting an omitted patch to `.0`.
/// Returns `(declared_version, is_caret)`.
pub fn extract_version_literal(content: &str) -> Option<(Version, bool)> {
    let caps = PRAGMA_RE.captures(content)?;
    let raw = caps.get(1)?.as_str();
    let is_caret = caps.get(0)?.as_str().contains('^');
    let normalized = if raw.matches('.').count() == 1 { format!("{raw}.0") } else { raw.to_owned() };
    Version::parse(&normalized).ok().map(|v| (v, is_caret))
}

/// Builds the version requirement a detected pragma implies: caret range if `^` was present,
/// exact match otherwise. Spec §4.2 only asks for "the pragma-declared compiler version"; this
/// crate intentionally does not attempt Solidity's full space-separated range-pragma grammar
/// (e.g. `>=0.8.0 <0.9.0`), since the spec's regex only ever captures a single version literal.
pub fn version_requirement(version: &Version, is_caret: bool) -> VersionReq {
    let spec = if is_caret { format!("^{version}") } else { format!("={version}") };
    VersionReq::parse(&spec).unwrap_or(VersionReq::STAR)
}

/// Result of a compiler-adapter attempt: the AST root (if compilation succeeded) and the
/// resolved compiler version actually used, if any.
pub struct CompileAttempt {
    pub ast: Option<Value>,
    pub solidity_version: Option<Version>,
}

/// Attempts to produce an AST for `content`. Never propagates an error: all failure modes
/// (no pragma, offline, solc unavailable, parse failure, timeout) degrade to
/// `CompileAttempt { ast: None, .. }` and are logged, per spec §4.2/§7.
pub fn try_parse(content: &str, config: &AnalyzerConfig) -> CompileAttempt {
    let Some((version, is_caret)) = extract_version_literal(content) else {
        tracing::debug!("no solidity pragma found; proceeding in text-only mode");
        return CompileAttempt { ast: None, solidity_version: None };
    };

    #[cfg(feature = "svm-solc")]
    {
        let requirement = version_requirement(&version, is_caret);
        match solc::Solc::ensure_installed(&requirement, config.offline) {
            Ok(resolved) => match solc::Solc::locate(&resolved) {
                Ok(compiler) => match compiler.compile(content, config.compiler_timeout) {
                    Ok(ast) => CompileAttempt { ast: Some(ast), solidity_version: Some(resolved) },
                    Err(err) => {
                        tracing::warn!(%err, "solc invocation failed; falling back to text-only analysis");
                        CompileAttempt { ast: None, solidity_version: None }
                    }
                },
                Err(err) => {
                    tracing::warn!(%err, "could not locate installed solc binary");
                    CompileAttempt { ast: None, solidity_version: None }
                }
            },
            Err(err) => {
                tracing::warn!(%err, "compiler unavailable for {requirement}");
                CompileAttempt { ast: None, solidity_version: None }
            }
        }
    }

    #[cfg(not(feature = "svm-solc"))]
    {
        let _ = (version, is_caret);
        tracing::debug!("svm-solc feature disabled; proceeding in text-only mode");
        CompileAttempt { ast: None, solidity_version: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_version_and_defaults_patch() {
        let (v, caret) = extract_version_literal("pragma solidity ^0.8;\n").unwrap();
        assert_eq!(v, Version::new(0, 8, 0));
        assert!(caret);
    }

    #[test]
    fn extracts_full_version_without_caret() {
        let (v, caret) = extract_version_literal("pragma solidity 0.7.6;\n").unwrap();
        assert_eq!(v, Version::new(0, 7, 6));
        assert!(!caret);
    }

    #[test]
    fn no_pragma_returns_none() {
        assert!(extract_version_literal("contract C {}").is_none());
    }
}
