use super::{escape_html, Finding, Report};
use crate::error::Result;
use crate::detector::Severity;
use std::fmt::Write as _;

/// Self-contained HTML render (spec §6.4): metadata table, a counts dashboard with a simple bar
/// chart, and a card per finding. No templating dependency is pulled in — the teacher's pack
/// carries none, and the prototype itself hand-formats its HTML string; this keeps that shape in
/// Rust `write!`/`format!` calls into a `String`.
pub fn emit(report: &Report) -> Result<String> {
    let mut out = String::new();
    let s = &report.summary;

    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Smart Contract Security Report</title></head><body>\n"
    );

    let _ = write!(
        out,
        "<h1>Smart Contract Security Report</h1>\n<table>\n\
        <tr><th>Target</th><td>{}</td></tr>\n\
        <tr><th>Timestamp</th><td>{}</td></tr>\n\
        <tr><th>Solidity version</th><td>{}</td></tr>\n\
        <tr><th>Framework</th><td>{}</td></tr>\n\
        <tr><th>Duration (s)</th><td>{:.2}</td></tr>\n</table>\n",
        escape_html(&report.analysis_metadata.target),
        escape_html(&report.analysis_metadata.timestamp),
        report.analysis_metadata.solidity_version.as_deref().unwrap_or("unknown"),
        report.analysis_metadata.framework.as_deref().unwrap_or("unknown"),
        report.analysis_metadata.analysis_duration_seconds,
    );

    let _ = write!(
        out,
        "<h2>Summary</h2>\n<table>\n\
        <tr><th>Total</th><td>{}</td></tr>\n\
        <tr><th>High</th><td>{}</td></tr>\n\
        <tr><th>Medium</th><td>{}</td></tr>\n\
        <tr><th>Low</th><td>{}</td></tr>\n\
        <tr><th>Informational</th><td>{}</td></tr>\n\
        <tr><th>Contracts analyzed</th><td>{}</td></tr>\n</table>\n",
        s.total_vulnerabilities,
        s.high_severity,
        s.medium_severity,
        s.low_severity,
        s.informational,
        s.total_contracts_analyzed,
    );

    let max = [s.high_severity, s.medium_severity, s.low_severity, s.informational]
        .into_iter()
        .max()
        .unwrap_or(0)
        .max(1);
    let _ = write!(out, "<h2>Severity distribution</h2>\n<div class=\"chart\">\n");
    for (label, count) in [
        ("High", s.high_severity),
        ("Medium", s.medium_severity),
        ("Low", s.low_severity),
        ("Informational", s.informational),
    ] {
        let width = (count * 100) / max;
        let _ = write!(
            out,
            "<div><span>{label}</span><div style=\"width:{width}%;background:#ccc;\">{count}</div></div>\n"
        );
    }
    let _ = write!(out, "</div>\n");

    let _ = write!(out, "<h2>Findings</h2>\n");
    for finding in report.vulnerabilities.iter().chain(report.informational_findings.iter()) {
        write_finding_card(&mut out, finding);
    }

    let _ = write!(out, "</body></html>\n");
    Ok(out)
}

fn write_finding_card(out: &mut String, finding: &Finding) {
    let badge_class = match finding.severity {
        Severity::High => "badge-high",
        Severity::Medium => "badge-medium",
        Severity::Low => "badge-low",
        Severity::Informational => "badge-info",
    };
    let swc_link = if finding.swc_id.starts_with("SWC-") {
        format!(
            "<a href=\"https://swcregistry.io/docs/{}\">{}</a>",
            escape_html(&finding.swc_id),
            escape_html(&finding.swc_id)
        )
    } else {
        escape_html(&finding.swc_id)
    };

    let _ = write!(
        out,
        "<div class=\"finding\">\n\
        <span class=\"{badge_class}\">{severity}</span>\n\
        <h3>{id} &mdash; {title}</h3>\n\
        <p>{swc_link}</p>\n\
        <p>Contract: {contract} | Function: {function} | Line: {line}</p>\n\
        <pre><code>{snippet}</code></pre>\n\
        <p class=\"fix\">{fix}</p>\n\
        </div>\n",
        severity = finding.severity,
        id = escape_html(&finding.id),
        title = escape_html(&finding.title),
        contract = escape_html(&finding.contract),
        function = finding.function.as_deref().map(escape_html).unwrap_or_default(),
        line = finding.location.start_line,
        snippet = escape_html(&finding.code_snippet),
        fix = escape_html(&finding.fix_suggestion),
    );
}
