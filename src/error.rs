//! Error types for pocket-ledger
//!
//! Domain operations return their own narrow error enums (`LedgerError`,
//! `AccountError`, `TransactionError`) so callers can inspect exactly why an
//! operation was declined. `PocketError` wraps those together with the
//! resource failures of the glue layers (settings, report files).

use thiserror::Error;

use crate::models::account::AccountError;
use crate::models::ledger::LedgerError;
use crate::models::transaction::TransactionError;

/// The main error type for pocket-ledger operations
#[derive(Error, Debug)]
pub enum PocketError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Input that could not be interpreted (menu input, CLI arguments)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A ledger declined an operation
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The account graph declined an operation
    #[error(transparent)]
    Account(#[from] AccountError),

    /// A transaction record could not be built
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Report file could not be written or read
    #[error("Report error: {0}")]
    Report(String),
}

impl PocketError {
    /// Check if this is a declined ledger/account operation rather than a
    /// resource failure
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Ledger(_) | Self::Account(_) | Self::Transaction(_) | Self::Validation(_)
        )
    }
}

impl From<std::io::Error> for PocketError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for pocket-ledger operations
pub type PocketResult<T> = Result<T, PocketError>;
