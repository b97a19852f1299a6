//! Error types for the load pipeline.

use load_backend::BackendError;
use thiserror::Error;
use xapi_generator::GeneratorError;

/// Errors that can end a load run.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Invalid or missing parameter, detected before any work starts.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend construction or write failure, as reported by the backend.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Statement generation error.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),
}
