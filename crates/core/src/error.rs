//! Core error types

use thiserror::Error;

/// Core error type for SkyChain
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration could not be parsed or contains an invalid value
    #[error("Configuration error: {0}")]
    Config(String),

    /// The log subscriber could not be built or installed
    #[error("Logging error: {0}")]
    Logging(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
