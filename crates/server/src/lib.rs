//! Ticket Triage Server
//!
//! HTTP API over the ticket lifecycle.

pub mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{error}: {details}")]
    Internal { error: String, details: String },
}

impl ServerError {
    /// Convert a lifecycle error, labelling internal failures with the operation
    pub fn from_core(err: ticket_triage_core::Error, operation: &str) -> Self {
        use ticket_triage_core::Error;

        match err {
            Error::Validation(message) => ServerError::InvalidRequest(message),
            Error::NotFound(_) => ServerError::NotFound(err.to_string()),
            other => ServerError::Internal {
                error: operation.to_string(),
                details: other.to_string(),
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ticket_triage_core::Error> for ServerError {
    fn from(err: ticket_triage_core::Error) -> Self {
        ServerError::from_core(err, "Internal server error")
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ServerError::InvalidRequest(error) | ServerError::NotFound(error) => {
                serde_json::json!({ "error": error })
            }
            ServerError::Internal { error, details } => {
                tracing::error!(%error, %details, "Request failed");
                serde_json::json!({ "error": error, "details": details })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_triage_core::Error;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::validation("bad"), StatusCode::BAD_REQUEST),
            (Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (Error::Storage("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::Configuration("cfg".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_internal_error_keeps_operation_and_details() {
        let err = ServerError::from_core(Error::Storage("disk full".into()), "Failed to create ticket");
        match err {
            ServerError::Internal { error, details } => {
                assert_eq!(error, "Failed to create ticket");
                assert_eq!(details, "Storage error: disk full");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
