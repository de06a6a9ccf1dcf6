//! Ledger model
//!
//! A ledger is an append-only list of transactions plus a cached balance.
//! Every accepted transaction moves the balance by exactly its signed amount,
//! and the balance is never allowed below zero. Rejections leave the ledger
//! untouched.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use super::ids::LedgerId;
use super::money::Money;
use super::transaction::{categories, Direction, Transaction, TransactionError};

/// Monthly interest rate applied to savings ledgers unless configured otherwise
pub fn default_interest_rate() -> Decimal {
    Decimal::new(5, 2)
}

/// What kind of ledger this is; savings ledgers accrue interest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    Standard,
    Savings { rate: Decimal },
}

impl LedgerKind {
    /// A savings kind with the default 5% monthly rate
    pub fn savings() -> Self {
        Self::Savings {
            rate: default_interest_rate(),
        }
    }

    pub fn is_savings(&self) -> bool {
        matches!(self, Self::Savings { .. })
    }

    /// The interest rate, if this kind accrues interest
    pub fn interest_rate(&self) -> Option<Decimal> {
        match self {
            Self::Standard => None,
            Self::Savings { rate } => Some(*rate),
        }
    }
}

impl Default for LedgerKind {
    fn default() -> Self {
        Self::Standard
    }
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "Standard"),
            Self::Savings { rate } => {
                write!(f, "Savings ({}%)", (rate * Decimal::ONE_HUNDRED).normalize())
            }
        }
    }
}

/// Reasons a ledger declines an operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Money),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },

    #[error("Only Deposit and Withdrawal can be replayed, got '{0}'")]
    UnsupportedCategory(String),

    #[error("Invalid spending category: '{0}'")]
    InvalidCategory(String),

    #[error("Balance would overflow")]
    AmountOverflow,

    #[error("Ledger '{0}' is not a savings ledger")]
    NotSavings(String),

    #[error("Interest rate cannot be negative, got {0}")]
    NegativeRate(Decimal),
}

impl From<TransactionError> for LedgerError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NonPositiveAmount(amount) => Self::NonPositiveAmount(amount),
            TransactionError::EmptyCategory => Self::InvalidCategory(String::new()),
        }
    }
}

/// A balance-carrying store of transactions
#[derive(Debug, Clone)]
pub struct Ledger {
    id: LedgerId,
    name: String,
    kind: LedgerKind,
    created_at: DateTime<Utc>,
    balance: Money,
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Create an empty standard ledger
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LedgerId::new(),
            name: name.into(),
            kind: LedgerKind::Standard,
            created_at: Utc::now(),
            balance: Money::zero(),
            transactions: Vec::new(),
        }
    }

    /// Create an empty savings ledger with the given monthly rate
    pub fn savings(name: impl Into<String>, rate: Decimal) -> Result<Self, LedgerError> {
        Self::with_kind(name, LedgerKind::Savings { rate }, Utc::now())
    }

    /// Create an empty ledger of any kind with an explicit creation time
    pub fn with_kind(
        name: impl Into<String>,
        kind: LedgerKind,
        created_at: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        if let LedgerKind::Savings { rate } = kind {
            if rate.is_sign_negative() && !rate.is_zero() {
                return Err(LedgerError::NegativeRate(rate));
            }
        }

        let mut ledger = Self::new(name);
        ledger.kind = kind;
        ledger.created_at = created_at;
        Ok(ledger)
    }

    pub fn id(&self) -> LedgerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current balance; O(1)
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Every recorded transaction in chronological order
    pub fn all_transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Transactions with `start <= timestamp <= end`, in chronological order
    ///
    /// Returns nothing when `start > end`.
    pub fn transactions_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.in_window(start, end))
            .cloned()
            .collect()
    }

    /// Deposit money now
    pub fn deposit(&mut self, amount: Money) -> Result<Transaction, LedgerError> {
        self.deposit_at(amount, Utc::now())
    }

    /// Deposit money, recording the transaction at `at`
    pub fn deposit_at(
        &mut self,
        amount: Money,
        at: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError> {
        Transaction::new(amount, categories::DEPOSIT, at)
            .map_err(LedgerError::from)
            .and_then(|txn| self.admit(txn))
            .map_err(|e| self.declined("deposit", e))
    }

    /// Withdraw money now
    pub fn withdraw(&mut self, amount: Money) -> Result<Transaction, LedgerError> {
        self.withdraw_at(amount, Utc::now())
    }

    /// Withdraw money, recording the transaction at `at`
    pub fn withdraw_at(
        &mut self,
        amount: Money,
        at: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError> {
        Transaction::new(amount, categories::WITHDRAWAL, at)
            .map_err(LedgerError::from)
            .and_then(|txn| self.admit(txn))
            .map_err(|e| self.declined("withdraw", e))
    }

    /// Spend money now under a spending category such as `Purchase`
    pub fn spend(
        &mut self,
        amount: Money,
        category: impl Into<String>,
    ) -> Result<Transaction, LedgerError> {
        self.spend_at(amount, category, Utc::now())
    }

    /// Spend money under a spending category, recording it at `at`
    ///
    /// Follows the withdrawal rules. `Deposit` is not a spending category.
    pub fn spend_at(
        &mut self,
        amount: Money,
        category: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError> {
        let category: String = category.into();
        if category.trim() == categories::DEPOSIT {
            return Err(self.declined("spend", LedgerError::InvalidCategory(category)));
        }

        Transaction::new(amount, category, at)
            .map_err(LedgerError::from)
            .and_then(|txn| self.admit(txn))
            .map_err(|e| self.declined("spend", e))
    }

    /// Replay a previously built transaction
    ///
    /// `Deposit` always applies; `Withdrawal` needs enough balance. Any other
    /// category is rejected. A rejected replay is not recorded.
    pub fn record_historical_transaction(
        &mut self,
        txn: Transaction,
    ) -> Result<Transaction, LedgerError> {
        let replayable = matches!(
            txn.category(),
            categories::DEPOSIT | categories::WITHDRAWAL
        );
        let result = if replayable {
            self.admit(txn)
        } else {
            Err(LedgerError::UnsupportedCategory(txn.category().to_string()))
        };
        result.map_err(|e| self.declined("replay", e))
    }

    /// Deposit one month of interest now
    pub fn apply_monthly_interest(&mut self) -> Result<Option<Transaction>, LedgerError> {
        self.apply_monthly_interest_at(Utc::now())
    }

    /// Deposit `balance * rate` as a regular `Deposit` transaction at `at`
    ///
    /// Returns `None` when the interest rounds to zero, in which case
    /// nothing is recorded.
    pub fn apply_monthly_interest_at(
        &mut self,
        at: DateTime<Utc>,
    ) -> Result<Option<Transaction>, LedgerError> {
        let rate = match self.kind {
            LedgerKind::Savings { rate } => rate,
            LedgerKind::Standard => {
                return Err(self.declined("interest", LedgerError::NotSavings(self.name.clone())))
            }
        };

        let interest = self
            .balance
            .apply_rate(rate)
            .ok_or(LedgerError::AmountOverflow)
            .map_err(|e| self.declined("interest", e))?;

        if !interest.is_positive() {
            debug!("ledger '{}': interest rounds to zero, nothing accrued", self.name);
            return Ok(None);
        }

        let txn = self.deposit_at(interest, at)?;
        info!(
            "ledger '{}': accrued {} interest at rate {}",
            self.name, interest, rate
        );
        Ok(Some(txn))
    }

    // Apply the balance rule and insert in chronological position. Records
    // sharing a timestamp keep their arrival order.
    fn admit(&mut self, txn: Transaction) -> Result<Transaction, LedgerError> {
        let balance = match txn.direction() {
            Direction::Inflow => self
                .balance
                .checked_add(txn.amount())
                .ok_or(LedgerError::AmountOverflow)?,
            Direction::Outflow => {
                if txn.amount() > self.balance {
                    return Err(LedgerError::InsufficientFunds {
                        requested: txn.amount(),
                        available: self.balance,
                    });
                }
                self.balance
                    .checked_sub(txn.amount())
                    .ok_or(LedgerError::AmountOverflow)?
            }
        };

        self.balance = balance;
        let index = self
            .transactions
            .partition_point(|t| t.timestamp() <= txn.timestamp());
        self.transactions.insert(index, txn.clone());

        debug!(
            "ledger '{}': recorded {} {}, balance {}",
            self.name,
            txn.category(),
            txn.amount(),
            self.balance
        );
        Ok(txn)
    }

    fn declined(&self, operation: &str, err: LedgerError) -> LedgerError {
        warn!("ledger '{}': {} declined: {}", self.name, operation, err);
        err
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] balance {}", self.name, self.kind, self.balance)
    }
}
