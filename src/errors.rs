use thiserror::Error;

/// Error type that captures intake ledger failures.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Storage failure: {0}")]
    StorageFailure(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IntakeError>;
