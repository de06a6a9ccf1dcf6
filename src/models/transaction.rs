//! Transaction record model
//!
//! A transaction is an immutable fact: an amount, a category label and the
//! instant it happened. Fields are private so a record cannot be altered once
//! a ledger has accepted it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::ids::TransactionId;
use super::money::Money;

/// Well-known category labels
pub mod categories {
    pub const DEPOSIT: &str = "Deposit";
    pub const WITHDRAWAL: &str = "Withdrawal";
    pub const PURCHASE: &str = "Purchase";
    pub const UTILITY_PAYMENT: &str = "UtilityPayment";
    pub const CASH_WITHDRAWAL: &str = "CashWithdrawal";
}

/// Which way money moves for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inflow,
    Outflow,
}

/// Reasons a transaction record cannot be built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Transaction amount must be positive, got {0}")]
    NonPositiveAmount(Money),
    #[error("Transaction category cannot be empty")]
    EmptyCategory,
}

/// An immutable ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    amount: Money,
    category: String,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction record
    ///
    /// The amount must be positive and the category must contain something
    /// other than whitespace. Surrounding whitespace is trimmed from the
    /// category.
    pub fn new(
        amount: Money,
        category: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, TransactionError> {
        if !amount.is_positive() {
            return Err(TransactionError::NonPositiveAmount(amount));
        }

        let category: String = category.into();
        let category = category.trim();
        if category.is_empty() {
            return Err(TransactionError::EmptyCategory);
        }

        Ok(Self {
            id: TransactionId::new(),
            amount,
            category: category.to_string(),
            timestamp,
        })
    }

    /// Create a record stamped with the current time
    pub fn now(amount: Money, category: impl Into<String>) -> Result<Self, TransactionError> {
        Self::new(amount, category, Utc::now())
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether `start <= timestamp <= end`
    pub fn in_window(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start <= self.timestamp && self.timestamp <= end
    }

    /// Only deposits add money; every other category takes it out
    pub fn direction(&self) -> Direction {
        if self.category == categories::DEPOSIT {
            Direction::Inflow
        } else {
            Direction::Outflow
        }
    }

    pub fn is_inflow(&self) -> bool {
        self.direction() == Direction::Inflow
    }

    pub fn is_outflow(&self) -> bool {
        self.direction() == Direction::Outflow
    }

    /// Amount with the sign of its effect on the balance
    pub fn signed_amount(&self) -> Money {
        match self.direction() {
            Direction::Inflow => self.amount,
            Direction::Outflow => -self.amount,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.category,
            self.amount
        )
    }
}
