// ================================================================
// File: promodash-common/src/error.rs
// ================================================================

use thiserror::Error;

use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Could not decode response at '{path}': {message}")]
    Decode { path: String, message: String },

    /// Field-level failures, either caught locally or returned by the server (HTTP 400).
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    /// Token refresh failed or the retried request was rejected again.
    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Another submission is still in flight")]
    Busy,

    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::SessionExpired | Error::Auth(_))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

impl From<chrono::format::ParseError> for Error {
    fn from(err: chrono::format::ParseError) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Error::Validation(errors)
    }
}
