//! Error types for timing logs.

use thiserror::Error;

/// Errors that can occur opening or reading timing logs.
#[derive(Error, Debug)]
pub enum TimingError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A timing line could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
