use std::path::PathBuf;

/// Crate-wide error taxonomy.
///
/// Only [`ScaError::SourceIOError`] and [`ScaError::ReportFormatError`] are fatal to the
/// operation that raised them; [`ScaError::CompilerUnavailable`] and [`ScaError::ParseError`]
/// are caught by the compiler adapter and downgrade the run to text-only analysis;
/// [`ScaError::DetectorError`] is caught per-detector by the runner.
#[derive(Debug, thiserror::Error)]
pub enum ScaError {
    #[error("failed to read source file {path}: {source}")]
    SourceIOError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source file {path} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },

    #[error("compiler unavailable for {requirement}: {reason}")]
    CompilerUnavailable { requirement: String, reason: String },

    #[error("failed to parse source with solc: {0}")]
    ParseError(String),

    #[error("detector {id} failed: {source}")]
    DetectorError {
        id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("report format error: {0}")]
    ReportFormatError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScaError>;
