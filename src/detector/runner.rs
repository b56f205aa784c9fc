use super::registry::Registry;
use crate::attribution::Attribution;
use crate::context::AnalysisContext;
use crate::error::ScaError;
use crate::report::{Finding, Location};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

/// Runs every registered detector over `ctx` and returns fully enriched findings, in detector
/// registration order then intra-detector emission order (spec §5's ordering guarantee).
pub fn run(registry: &Registry, ctx: &AnalysisContext) -> Vec<Finding> {
    run_with_cancel(registry, ctx, &AtomicBool::new(false))
}

/// Same as [`run`], but checks `cancel` between detectors (spec §5: "the runner checks a cancel
/// flag between detectors").
pub fn run_with_cancel(registry: &Registry, ctx: &AnalysisContext, cancel: &AtomicBool) -> Vec<Finding> {
    let attribution = match &ctx.ast {
        Some(ast) => Attribution::build(ast, &ctx.line_index),
        None => Attribution::empty(),
    };

    let mut findings = Vec::new();
    for detector in registry.detectors() {
        if cancel.load(Ordering::Relaxed) {
            break;
        }

        let raw = match catch_unwind(AssertUnwindSafe(|| detector.run(ctx))) {
            Ok(raw) => raw,
            Err(panic) => {
                let reason = panic_message(&panic);
                let err = ScaError::DetectorError { id: detector.id().to_owned(), source: reason.into() };
                tracing::warn!(detector = detector.id(), %err, "detector failed; contributing zero findings");
                continue;
            }
        };

        for raw_finding in raw {
            let (contract, function) = attribution.locate(raw_finding.line);
            let (snippet, end_line) = ctx.source.snippet(raw_finding.line);
            findings.push(Finding {
                id: String::new(),
                detector: detector.id().to_owned(),
                severity: detector.severity(),
                swc_id: detector.swc_id().unwrap_or(detector.id()).to_owned(),
                title: detector.title().to_owned(),
                description: raw_finding.message.unwrap_or_else(|| detector.description().to_owned()),
                contract,
                function: (!function.is_empty()).then_some(function),
                location: Location { file: ctx.filename().to_owned(), start_line: raw_finding.line, end_line },
                code_snippet: snippet,
                fix_suggestion: detector.fix_suggestion().to_owned(),
                confidence: detector.confidence(),
            });
        }
    }
    findings
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "detector panicked with a non-string payload".to_owned()
    }
}
