//! Error type shared by every solver in the crate.
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | `UnstableConfiguration` | heat solvers when r >= 0.5 |
//! | `NoStableCombination` | parameter sweep with no admissible (nx, nt) |
//! | `DomainError` | degenerate numeric input (nx <= 1, zero modes, ...) |
//! | `ConfigurationError` | malformed or missing configuration |
//! | `ArrayFormat` | malformed .npy file |
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Unstable configuration: r={r}. Ensure r < 0.5.")]
    UnstableConfiguration { r: f64 },
    #[error("No stable combinations found for parameters in {source_name}.")]
    NoStableCombination { source_name: String },
    #[error("Domain error: {0}")]
    DomainError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Array format error: {0}")]
    ArrayFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SolverError {
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        SolverError::DomainError(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SolverError::ConfigurationError(msg.into())
    }
}

pub type SolverResult<T> = Result<T, SolverError>;
