//! Store errors

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    /// A UNIQUE constraint rejected the write; `constraint` is `table.column`
    #[error("Duplicate key: {constraint}")]
    Duplicate { constraint: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Ledger corrupted: {0}")]
    LedgerCorrupted(String),

    #[error("Token error: {0}")]
    Token(#[from] skychain_chain::ChainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store connection lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Whether this is a UNIQUE violation on `column`
    pub fn is_duplicate_on(&self, column: &str) -> bool {
        match self {
            StoreError::Duplicate { constraint } => constraint
                .split(", ")
                .any(|c| c.rsplit('.').next() == Some(column)),
            _ => false,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, Some(message)) = &err {
            if code.code == ErrorCode::ConstraintViolation {
                if let Some(constraint) = message.strip_prefix("UNIQUE constraint failed: ") {
                    return StoreError::Duplicate {
                        constraint: constraint.to_string(),
                    };
                }
            }
        }
        StoreError::Database(err)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
