//! Report Assembler & Emitters (spec §4.9 / §6): classifies findings, assigns stable IDs,
//! aggregates a summary, and serializes to any of JSON, SARIF, JUnit, or HTML.

pub mod html;
pub mod json;
pub mod junit;
pub mod sarif;

use crate::detector::{Confidence, Severity};
use crate::error::{Result, ScaError};
use serde::{Deserialize, Serialize};

pub const SCA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    SlitherJson,
    Sarif,
    Junit,
    Html,
}

impl ReportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "json" => Some(Self::Json),
            "slither-json" => Some(Self::SlitherJson),
            "sarif" => Some(Self::Sarif),
            "junit" => Some(Self::Junit),
            "html" => Some(Self::Html),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// A fully enriched finding (spec §3 "Finding"), ready for emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub detector: String,
    pub severity: Severity,
    pub swc_id: String,
    pub title: String,
    pub description: String,
    pub contract: String,
    pub function: Option<String>,
    pub location: Location,
    pub code_snippet: String,
    pub fix_suggestion: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractInfo {
    pub name: String,
    pub source_file: String,
    pub source_lines: LineRange,
    pub is_upgradeable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub timestamp: String,
    pub target: String,
    pub analysis_duration_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solidity_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_vulnerabilities: usize,
    pub high_severity: usize,
    pub medium_severity: usize,
    pub low_severity: usize,
    pub informational: usize,
    pub total_contracts_analyzed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub sca_version: String,
    pub analysis_metadata: AnalysisMetadata,
    pub contracts_analyzed: Vec<ContractInfo>,
    pub vulnerabilities: Vec<Finding>,
    pub informational_findings: Vec<Finding>,
    pub summary: Summary,
}

impl Report {
    /// Partitions findings by severity, assigns `VULN-NNN`/`INFO-NNN` IDs in input order (spec
    /// §4.9 steps 1-2), and computes the summary (step 3).
    pub fn assemble(
        findings: Vec<Finding>,
        contracts: Vec<ContractInfo>,
        metadata: AnalysisMetadata,
    ) -> Self {
        let mut vulnerabilities = Vec::new();
        let mut informational_findings = Vec::new();
        let mut high_severity = 0;
        let mut medium_severity = 0;
        let mut low_severity = 0;

        for mut finding in findings {
            match finding.severity {
                Severity::Informational => {
                    finding.id = format!("INFO-{:03}", informational_findings.len() + 1);
                    informational_findings.push(finding);
                }
                severity => {
                    match severity {
                        Severity::High => high_severity += 1,
                        Severity::Medium => medium_severity += 1,
                        Severity::Low => low_severity += 1,
                        Severity::Informational => unreachable!(),
                    }
                    finding.id = format!("VULN-{:03}", vulnerabilities.len() + 1);
                    vulnerabilities.push(finding);
                }
            }
        }

        let summary = Summary {
            total_vulnerabilities: vulnerabilities.len(),
            high_severity,
            medium_severity,
            low_severity,
            informational: informational_findings.len(),
            total_contracts_analyzed: contracts.len(),
        };

        Self {
            sca_version: SCA_VERSION.to_owned(),
            analysis_metadata: metadata,
            contracts_analyzed: contracts,
            vulnerabilities,
            informational_findings,
            summary,
        }
    }

    /// Rejects a JSON value missing the `summary` or `vulnerabilities` keys before a caller
    /// attempts a full typed deserialize (spec §6.5), the same two-phase shape-check-then-trust
    /// pattern the teacher uses validating a cache file before deserializing it.
    pub fn validate_shape(value: &serde_json::Value) -> Result<()> {
        let obj = value
            .as_object()
            .ok_or_else(|| ScaError::ReportFormatError("report is not a JSON object".into()))?;
        for key in ["summary", "vulnerabilities"] {
            if !obj.contains_key(key) {
                return Err(ScaError::ReportFormatError(format!("report is missing required key \"{key}\"")));
            }
        }
        Ok(())
    }
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
