use super::Report;
use crate::error::Result;

/// Structured JSON Report (spec §6.1): the primary, stable wire format.
pub fn emit(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{AnalysisMetadata, Summary};

    #[test]
    fn round_trips_through_serde() {
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
            vulnerabilities: Vec::new(),
            informational_findings: Vec::new(),
            summary: Summary::default(),
        };
        let json = emit(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sca_version"], "1.0.0");
        Report::validate_shape(&value).unwrap();
    }
}
