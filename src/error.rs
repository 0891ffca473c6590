use crate::filters::FilterError;
use crate::validation::FieldErrors;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the client library
#[derive(Debug, Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("response from {0} carried no data")]
    MissingData(String),

    #[error("invalid filters: {0}")]
    Filter(#[from] FilterError),

    #[error("{0}")]
    Validation(FieldErrors),

    #[error("not signed in")]
    Unauthenticated,

    #[error("session storage error: {0}")]
    Storage(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Message suitable for an error banner
    pub fn user_message(&self) -> String {
        match self {
            Error::Status { message, .. } | Error::Rejected(message) => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Error::Validation(errors)
    }
}
