//! Detector Registry & Runner (spec §4.6): a fixed, statically-registered collection of
//! detector values invoked uniformly over an [`AnalysisContext`].

pub mod registry;
pub mod rules;
pub mod runner;

use crate::context::AnalysisContext;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
    Informational,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Informational => "Informational",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::High
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        })
    }
}

/// What a detector emits before C6 enriches it with metadata, snippet, and attribution.
#[derive(Debug, Clone)]
pub struct RawFinding {
    pub line: usize,
    /// Overrides the detector's default description for this specific site, if set.
    pub message: Option<String>,
}

impl RawFinding {
    pub fn at(line: usize) -> Self {
        Self { line, message: None }
    }

    pub fn with_message(line: usize, message: impl Into<String>) -> Self {
        Self { line, message: Some(message.into()) }
    }
}

/// Static metadata plus a check operation, uniform across all fourteen reference detectors.
/// Defaults mirror the Python prototype's `BaseDetector` property defaults.
pub trait Detector: Send + Sync {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn severity(&self) -> Severity;

    fn title(&self) -> &'static str {
        self.description()
    }

    fn swc_id(&self) -> Option<&'static str> {
        self.id().starts_with("SWC-").then(|| self.id())
    }

    fn confidence(&self) -> Confidence {
        Confidence::High
    }

    fn fix_suggestion(&self) -> &'static str {
        "Review the flagged code and apply the standard mitigation for this weakness class."
    }

    fn run(&self, ctx: &AnalysisContext) -> Vec<RawFinding>;
}
