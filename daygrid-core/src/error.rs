//! Error types for daygrid-core

use thiserror::Error;

/// Main error type for the daygrid-core library
#[derive(Error, Debug)]
pub enum Error {
    /// A session time that is not `HH:MM`
    #[error("invalid time format: {value:?} (expected HH:MM)")]
    InvalidTimeFormat { value: String },

    /// Two sessions in one input share an id
    #[error("duplicate session id: {0}")]
    DuplicateSessionId(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid_time(value: &str) -> Self {
        Error::InvalidTimeFormat {
            value: value.to_string(),
        }
    }
}

/// Result type alias for daygrid-core
pub type Result<T> = std::result::Result<T, Error>;
