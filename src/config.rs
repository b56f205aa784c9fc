use std::time::Duration;

/// Tunables for a single [`crate::analyze`] run.
///
/// Mirrors the small, struct-of-flags configuration shape the teacher crate uses for its
/// `Project`/`ProjectPathsConfig` builders, scaled down to what a single-file analyzer needs.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Maximum time to let the compiler adapter block on a solc invocation (including a possible
    /// network install) before falling back to text-only analysis. Default 60s (spec §5).
    pub compiler_timeout: Duration,
    /// When set, the compiler adapter never attempts to install a missing solc version; it only
    /// looks at what is already installed. Useful in sandboxed/offline environments.
    pub offline: bool,
    /// Optional hint recorded verbatim into the report's `analysis_metadata.framework`.
    pub framework: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { compiler_timeout: Duration::from_secs(60), offline: false, framework: None }
    }
}
