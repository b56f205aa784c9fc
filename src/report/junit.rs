use super::Report;
use crate::error::{Result, ScaError};
use quick_junit::{NonSuccessKind, Report as JunitReport, TestCase, TestCaseStatus, TestSuite};

const SUITE_NAME: &str = "SmartContractSecurityChecks";

/// JUnit XML emission (spec §6.3), via the same `quick-junit` crate `forge`'s test runner uses
/// for its own report, instead of hand-rolling XML the way the prototype does with
/// `xml.etree.ElementTree`.
pub fn emit(report: &Report) -> Result<String> {
    let mut suite = TestSuite::new(SUITE_NAME);

    for finding in report.vulnerabilities.iter().chain(report.informational_findings.iter()) {
        let name = format!("{} at line {}", finding.description, finding.location.start_line);
        let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
        status.set_message(finding.description.clone());
        status.set_description(format!(
            "{}\n{}\n{}\n{}",
            finding.severity, finding.location.file, finding.location.start_line, finding.code_snippet
        ));
        let mut case = TestCase::new(name, status);
        case.set_classname(finding.detector.clone());
        suite.add_test_case(case);
    }

    let mut junit_report = JunitReport::new(SUITE_NAME);
    junit_report.add_test_suite(suite);
    junit_report.to_string().map_err(|err| ScaError::ReportFormatError(err.to_string()))
}
