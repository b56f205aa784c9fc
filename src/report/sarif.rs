use super::{Finding, Report};
use crate::detector::Severity;
use crate::error::Result;
use serde::Serialize;

const TOOL_NAME: &str = "Smart-Contract-Analyzer";
const TOOL_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize)]
struct SarifLog {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<Run>,
}

#[derive(Debug, Serialize)]
struct Run {
    tool: Tool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct Tool {
    driver: Driver,
}

#[derive(Debug, Serialize)]
struct Driver {
    name: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: &'static str,
    message: Message,
    locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
struct Message {
    text: String,
}

#[derive(Debug, Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: PhysicalLocation,
}

#[derive(Debug, Serialize)]
struct PhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: ArtifactLocation,
    region: Region,
}

#[derive(Debug, Serialize)]
struct ArtifactLocation {
    uri: String,
}

#[derive(Debug, Serialize)]
struct Region {
    #[serde(rename = "startLine")]
    start_line: usize,
}

fn to_result(finding: &Finding) -> SarifResult {
    SarifResult {
        rule_id: finding.detector.clone(),
        level: if finding.severity == Severity::High { "error" } else { "warning" },
        message: Message { text: finding.description.clone() },
        locations: vec![SarifLocation {
            physical_location: PhysicalLocation {
                artifact_location: ArtifactLocation {
                    uri: finding.location.file.replace('\\', "/"),
                },
                region: Region { start_line: finding.location.start_line },
            },
        }],
    }
}

/// SARIF 2.1.0 emission (spec §6.2): one run, one result per finding (vulnerabilities and
/// informational findings alike).
pub fn emit(report: &Report) -> Result<String> {
    let results = report
        .vulnerabilities
        .iter()
        .chain(report.informational_findings.iter())
        .map(to_result)
        .collect();

    let log = SarifLog {
        schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
        version: "2.1.0",
        runs: vec![Run { tool: Tool { driver: Driver { name: TOOL_NAME, version: TOOL_VERSION } }, results }],
    };
    Ok(serde_json::to_string_pretty(&log)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Confidence;
    use crate::report::{AnalysisMetadata, Location, Summary};

    fn sample_finding(severity: Severity) -> Finding {
        Finding {
            id: "VULN-001".into(),
            detector: "SWC-107".into(),
            severity,
            swc_id: "SWC-107".into(),
            title: "Reentrancy".into(),
            description: "external call before state update".into(),
            contract: "Bank".into(),
            function: Some("withdraw".into()),
            location: Location { file: "t.sol".into(), start_line: 5, end_line: 5 },
            code_snippet: "x.call(...)".into(),
            fix_suggestion: "use checks-effects-interactions".into(),
            confidence: Confidence::High,
        }
    }

    #[test]
    fn high_severity_maps_to_error_level() {
        let report = Report {
            sca_version: super::super::SCA_VERSION.to_owned(),
            analysis_metadata: AnalysisMetadata {
                timestamp: "2024-01-01T00:00:00Z".into(),
                target: "t.sol".into(),
                analysis_duration_seconds: 0.1,
                solidity_version: None,
                framework: None,
            },
            contracts_analyzed: Vec::new(),
            vulnerabilities: vec![sample_finding(Severity::High)],
            informational_findings: Vec::new(),
            summary: Summary::default(),
        };
        let sarif = emit(&report).unwrap();
        assert!(sarif.contains("\"level\": \"error\""));
        assert!(sarif.contains("Smart-Contract-Analyzer"));
    }
}
