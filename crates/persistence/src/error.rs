//! Persistence errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Snapshot {path} is not valid ticket JSON: {message}")]
    CorruptSnapshot { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PersistenceError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        PersistenceError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

impl From<PersistenceError> for ticket_triage_core::Error {
    fn from(err: PersistenceError) -> Self {
        ticket_triage_core::Error::Storage(err.to_string())
    }
}
