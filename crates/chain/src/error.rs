//! Chain utility errors

use thiserror::Error;

/// Errors raised while producing tokens or payloads
#[derive(Debug, Error)]
pub enum ChainError {
    /// Input could not be serialized into its canonical form
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// QR payload could not be decoded
    #[error("Invalid QR payload: {0}")]
    InvalidPayload(String),
}

/// Result alias for chain utilities
pub type Result<T> = std::result::Result<T, ChainError>;
