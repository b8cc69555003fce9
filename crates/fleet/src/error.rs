//! Fleet operation errors
//!
//! The variants mirror what callers need to tell apart: bad input, a missing
//! entity, a reference to a missing entity, a uniqueness clash, a bad checklist
//! index, and everything else.

use skychain_chain::ChainError;
use skychain_domain::DomainError;
use skychain_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    /// Field-level validation messages
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    /// A referenced aircraft or mechanic does not exist
    #[error("{0}")]
    InvalidReference(String),

    #[error("{0}")]
    DuplicateKey(String),

    #[error("{0}")]
    OutOfRange(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FleetError {
    pub fn validation(message: impl Into<String>) -> Self {
        FleetError::Validation(vec![message.into()])
    }

    pub fn not_found(entity: &str) -> Self {
        FleetError::NotFound(format!("{} not found", entity))
    }

    pub fn invalid_reference(entity: &str) -> Self {
        FleetError::InvalidReference(format!("{} not found", entity))
    }
}

/// User-facing message for a UNIQUE violation on `constraint` (`table.column`)
fn duplicate_message(constraint: &str) -> &'static str {
    let column = constraint.rsplit('.').next().unwrap_or(constraint);
    match column {
        "registration" => "Aircraft registration already exists",
        "serial_number" | "blockchain_hash" => "Part serial number already exists",
        "employee_id" | "email" | "wallet_address" => "Email or employee ID already exists",
        "work_order" => "Work order number already exists",
        "transaction_hash" => "Transaction already exists",
        _ => "Duplicate key",
    }
}

impl From<StoreError> for FleetError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => FleetError::not_found(entity),
            StoreError::Duplicate { constraint } => {
                FleetError::DuplicateKey(duplicate_message(&constraint).to_string())
            }
            other => FleetError::Internal(other.to_string()),
        }
    }
}

impl From<DomainError> for FleetError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(messages) => FleetError::Validation(messages),
            DomainError::OutOfRange { .. } => FleetError::OutOfRange("Invalid task index".to_string()),
            DomainError::InvalidStatus(message) => FleetError::Validation(vec![message]),
        }
    }
}

impl From<ChainError> for FleetError {
    fn from(err: ChainError) -> Self {
        FleetError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FleetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let dup: FleetError = StoreError::Duplicate {
            constraint: "mechanics.email".to_string(),
        }
        .into();
        assert!(matches!(dup, FleetError::DuplicateKey(ref m) if m == "Email or employee ID already exists"));

        let missing: FleetError = StoreError::not_found("Part", "p-1").into();
        assert_eq!(missing.to_string(), "Part not found");

        let poisoned: FleetError = StoreError::Poisoned.into();
        assert!(matches!(poisoned, FleetError::Internal(_)));
    }

    #[test]
    fn test_domain_error_mapping() {
        let err: FleetError = DomainError::OutOfRange { index: 4, len: 2 }.into();
        assert_eq!(err.to_string(), "Invalid task index");

        let err: FleetError = DomainError::Validation(vec!["\"model\" is required".to_string()]).into();
        assert!(matches!(err, FleetError::Validation(ref m) if m.len() == 1));
    }
}
