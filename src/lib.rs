#![doc = include_str!("../README.md")]
#![warn(rustdoc::all)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

pub mod ast;
pub mod attribution;
pub mod compiler;
pub mod config;
pub mod context;
pub mod detector;
pub mod error;
pub mod ir;
pub mod report;
pub mod source;

use ast::{walker::walk, NodeKind};
use config::AnalyzerConfig;
use context::AnalysisContext;
use detector::registry::Registry;
use error::{Result, ScaError};
use report::{AnalysisMetadata, ContractInfo, LineRange, Report, ReportFormat};
use source::SourceSnapshot;
use std::path::Path;
use std::time::Instant;

/// Analyzes a single Solidity source file end to end (C1 through C9) using the default
/// detector registry and analyzer configuration.
pub fn analyze(path: impl AsRef<Path>) -> Result<Report> {
    analyze_with_config(path, &AnalyzerConfig::default())
}

/// Same as [`analyze`], with an explicit [`AnalyzerConfig`].
pub fn analyze_with_config(path: impl AsRef<Path>, config: &AnalyzerConfig) -> Result<Report> {
    let start = Instant::now();
    let target = path.as_ref().display().to_string();

    let source = SourceSnapshot::read(path)?;
    let ctx = AnalysisContext::build(source, config);

    let registry = Registry::standard();
    let findings = detector::runner::run(&registry, &ctx);
    let contracts = collect_contracts(&ctx);

    let metadata = AnalysisMetadata {
        timestamp: current_timestamp(),
        target,
        analysis_duration_seconds: round_seconds(start.elapsed().as_secs_f64()),
        solidity_version: ctx.solidity_version.as_ref().map(ToString::to_string),
        framework: config.framework.clone(),
    };

    Ok(Report::assemble(findings, contracts, metadata))
}

/// Analyzes `path` and writes the rendered report to `output_path` in the requested format
/// (spec §6.5).
pub fn analyze_and_emit(
    path: impl AsRef<Path>,
    format: ReportFormat,
    output_path: impl AsRef<Path>,
) -> Result<Report> {
    let report = analyze(path)?;
    let rendered = match format {
        ReportFormat::Json | ReportFormat::SlitherJson => report::json::emit(&report)?,
        ReportFormat::Sarif => report::sarif::emit(&report)?,
        ReportFormat::Junit => report::junit::emit(&report)?,
        ReportFormat::Html => report::html::emit(&report)?,
    };
    std::fs::write(output_path, rendered)?;
    Ok(report)
}

/// Reads a previously emitted JSON report and yields the same in-memory shape (spec §6.5).
/// Rejects any input missing the `summary` or `vulnerabilities` keys before attempting a full
/// typed deserialize.
pub fn import_report(path: impl AsRef<Path>) -> Result<Report> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|source| ScaError::SourceIOError { path: path.to_path_buf(), source })?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    Report::validate_shape(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// Enumerates every `ContractDefinition` in the analyzed AST (spec §4.9 `contracts_analyzed`).
/// Empty when the file never compiled.
fn collect_contracts(ctx: &AnalysisContext) -> Vec<ContractInfo> {
    let Some(ast) = &ctx.ast else { return Vec::new() };
    let filename = ctx.filename().to_owned();
    let mut contracts = Vec::new();
    walk(ast, &mut |node, _| {
        if !node.is(NodeKind::ContractDefinition) {
            return;
        }
        let Some(src) = node.src() else { return };
        let start = ctx.line_index.line_at(src.offset);
        let end = ctx.line_index.line_at(src.offset + src.length.saturating_sub(1));
        let is_upgradeable = node
            .get_array("baseContracts")
            .into_iter()
            .filter_map(|b| b.get("baseName"))
            .filter_map(|n| n.name().map(ToOwned::to_owned))
            .any(|name| name.contains("Upgradeable") || name.contains("Proxy"));

        contracts.push(ContractInfo {
            name: node.name().unwrap_or_default().to_owned(),
            source_file: filename.clone(),
            source_lines: LineRange { start, end },
            is_upgradeable,
        });
    });
    contracts
}

fn round_seconds(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

/// `YYYY-MM-DDTHH:MM:SSZ`, computed from the system clock without pulling in a date/time crate
/// the rest of the corpus doesn't already use — civil-from-days is the same algorithm
/// `std::time`-based tooling in this ecosystem reaches for when avoiding a `chrono`/`time`
/// dependency.
fn current_timestamp() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let total_secs = now.as_secs();
    let (days, secs_of_day) = (total_secs / 86_400, total_secs % 86_400);
    let (hour, minute, second) = (secs_of_day / 3600, (secs_of_day % 3600) / 60, secs_of_day % 60);
    let (year, month, day) = civil_from_days(days as i64);
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z")
}

/// Howard Hinnant's `civil_from_days`: converts a day count since the Unix epoch into a
/// proleptic-Gregorian `(year, month, day)`.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = if month <= 2 { y + 1 } else { y };
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn civil_from_days_matches_known_epoch() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(19723), (2024, 1, 1));
    }

    #[test]
    fn analyze_missing_file_is_fatal() {
        let err = analyze("does-not-exist.sol").unwrap_err();
        assert!(matches!(err, ScaError::SourceIOError { .. }));
    }

    #[test]
    fn analyze_text_only_contract_finds_reentrancy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Bank.sol");
        std::fs::write(
            &path,
            r#"
            pragma solidity ^0.7.0;
            contract Bank {
                mapping(address => uint) balances;
                function withdraw(uint amount) public {
                    msg.sender.call.value(amount)("");
                    balances[msg.sender] -= amount;
                }
            }
            "#,
        )
        .unwrap();

        let report = analyze(&path).unwrap();
        assert!(report.summary.total_vulnerabilities > 0);
        assert!(report.vulnerabilities.iter().any(|f| f.detector == "SWC-107"));
    }

    #[test]
    fn import_report_rejects_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"foo": "bar"}"#).unwrap();
        let err = import_report(&path).unwrap_err();
        assert!(matches!(err, ScaError::ReportFormatError(_)));
    }
}
