//! Error types for the inference collaborator boundary

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Inference call timed out after {0} ms")]
    Timeout(u64),

    #[error("Inference provider unavailable: {0}")]
    Unavailable(String),

    #[error("Inference provider returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid inference configuration: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, InferenceError>;
