use thiserror::Error;

use crate::ledger::CollectionKind;

/// Error type that captures ledger, persistence, and engine failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored data is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid entry: {0}")]
    Validation(String),
    #[error("No {collection} entry with id {id}")]
    EntryNotFound { collection: CollectionKind, id: u32 },
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
