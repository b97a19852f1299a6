//! Error types shared by all backends.

use thiserror::Error;

/// Errors that can occur constructing or writing to a backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding error.
    #[error("CSV error: {0}")]
    Csv(String),

    /// A record could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The destination could not be reached or refused the credentials.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The destination answered but rejected the request.
    #[error("Request rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnosis.
        body: String,
    },

    /// Missing or invalid backend parameters.
    #[error("Configuration error: {0}")]
    Config(String),
}
