// High-level command handlers shared by every front end.
// These return structured data instead of formatted strings.

pub mod auth;
pub mod campaign;
pub mod dialog;
pub mod form_field;
pub mod marketing;
pub mod resource;
pub mod reward;

use promodash_common::{Error, FieldErrors};

/// Result type that can include both data and warnings
pub struct CommandResult<T> {
    pub data: T,
    pub warnings: Vec<String>,
}

impl<T> CommandResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            warnings: vec![],
        }
    }

    pub fn with_warnings(data: T, warnings: Vec<String>) -> Self {
        Self {
            data,
            warnings,
        }
    }
}

/// Common error type for command operations
#[derive(Debug)]
pub enum CommandError {
    ApiError(String),
    NotFound(String),
    InvalidInput(String),
    /// Rejected locally or by the server; messages are keyed by field.
    Validation(FieldErrors),
    SessionExpired,
    PermissionDenied(String),
    /// A submission from the same dialog is still in flight.
    Busy,
    /// `confirm`/`submit` without an open dialog or pending deletion.
    NothingPending(String),
    DataError(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::ApiError(msg) => write!(f, "API error: {}", msg),
            CommandError::NotFound(msg) => write!(f, "Not found: {}", msg),
            CommandError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CommandError::Validation(errors) => write!(f, "Please fix: {}", errors),
            CommandError::SessionExpired => write!(f, "Session expired, please log in again"),
            CommandError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            CommandError::Busy => write!(f, "Still saving, please wait"),
            CommandError::NothingPending(msg) => write!(f, "{}", msg),
            CommandError::DataError(msg) => write!(f, "Data error: {}", msg),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<Error> for CommandError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(errors) => CommandError::Validation(errors),
            Error::NotFound(msg) => CommandError::NotFound(msg),
            Error::SessionExpired | Error::Auth(_) => CommandError::SessionExpired,
            Error::Forbidden(msg) => CommandError::PermissionDenied(msg),
            Error::Busy => CommandError::Busy,
            Error::Decode { .. } | Error::Json(_) | Error::Parse(_) => CommandError::DataError(err.to_string()),
            Error::Io(e) => CommandError::InvalidInput(e.to_string()),
            other => CommandError::ApiError(other.to_string()),
        }
    }
}
