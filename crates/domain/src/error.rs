//! Domain errors
//!
//! Pure domain errors with no infrastructure dependencies

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One message per offending field
    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Task index {index} out of range for checklist of {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("Invalid status change: {0}")]
    InvalidStatus(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(vec![message.into()])
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
