//! Error types shared across the triage crates

use std::time::Duration;
use thiserror::Error;

/// Result alias using the core error type
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level triage error
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input fields, rejected before any pipeline work
    #[error("Validation error: {0}")]
    Validation(String),

    /// Analyzer failure. The lifecycle recovers from this locally.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Unknown ticket id
    #[error("Ticket not found: {0}")]
    NotFound(String),

    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Store failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Shorthand for a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Check if this error should be reported as a client mistake
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::NotFound(_))
    }
}

/// Analyzer failures
///
/// Any of these drives a ticket into manual review instead of failing creation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Underlying mechanism could not be reached
    #[error("AI analysis failed: service unreachable: {0}")]
    Unreachable(String),

    /// Service answered with an error status
    #[error("AI analysis failed: {0}")]
    Api(String),

    /// Service answered with something that is not a classification
    #[error("AI analysis failed: malformed response: {0}")]
    MalformedResponse(String),

    /// Analysis did not finish within the configured bound
    #[error("AI analysis failed: timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}
