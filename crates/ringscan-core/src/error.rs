//! Error types for the RingScan engine.

use thiserror::Error;

/// Result type alias using `EngineError`.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur around an analysis run.
///
/// The engine itself is a pure function of pre-validated input, so
/// `Validation` errors are only ever produced by the ingestion boundary;
/// `Internal` is a programming-defect signal, not a user-facing condition.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or incomplete input records (missing field, unparseable
    /// timestamp, negative amount). Raised by the external parser, never
    /// by the detection crates.
    #[error("Input validation failed: {0}")]
    Validation(String),

    /// Unexpected failure during graph construction or detection.
    #[error("Internal engine error: {0}")]
    Internal(String),

    /// Invalid engine configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error at the ingestion boundary.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        EngineError::Config(msg.into())
    }

    /// Returns true if this error originated at the ingestion boundary
    /// and should be mapped to a user-facing message.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation(_))
    }
}
