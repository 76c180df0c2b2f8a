//! Error types for Rapport.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied missing or malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The external model service rejected a request.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The external model service could not be reached or was overloaded.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the caller caused this error (maps to a 400 response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::UnsupportedFile(_))
    }

    /// Whether retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Timeout(_) | Error::Unavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
