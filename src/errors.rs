use std::result::Result as StdResult;

use thiserror::Error;

use crate::domain::TransactionId;

/// Error type covering store, import/export and form failures.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),
    #[error("Duplicate transaction id: {0}")]
    DuplicateId(TransactionId),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Import rejected: {0}")]
    ImportRejected(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ExpenseError {
    /// True for the "no matching record" condition, which callers treat as a no-op.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExpenseError::TransactionNotFound(_))
    }
}

pub type Result<T> = StdResult<T, ExpenseError>;

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ExpenseError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Core(ExpenseError::Io(err))
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Input(format!("prompt failed: {err}"))
    }
}
