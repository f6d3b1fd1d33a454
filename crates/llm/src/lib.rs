//! LLM-backed ticket analysis
//!
//! Features:
//! - OpenAI-compatible chat completions backend (OpenAI, Azure-style proxies, vLLM)
//! - Classification prompt construction
//! - Tolerant response parsing with normalization to safe defaults
//! - `LlmAnalyzer`, the `TicketAnalyzer` implementation over any backend

pub mod analyzer;
pub mod backend;
pub mod prompt;
pub mod response;

pub use analyzer::LlmAnalyzer;
pub use backend::{GenerationResult, LlmBackend, OpenAIBackend, OpenAIConfig};
pub use prompt::{Message, PromptBuilder, Role};
pub use response::parse_classification;

use thiserror::Error;
use ticket_triage_core::AnalysisError;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_decode() {
            LlmError::InvalidResponse(err.to_string())
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for AnalysisError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api(msg) => AnalysisError::Api(msg),
            LlmError::Network(msg) => AnalysisError::Unreachable(msg),
            LlmError::InvalidResponse(msg) => AnalysisError::MalformedResponse(msg),
            LlmError::Timeout => AnalysisError::Unreachable("request timed out".to_string()),
            LlmError::Configuration(msg) => AnalysisError::Api(msg),
        }
    }
}
