//! Core data models for pocket-ledger
//!
//! Money, transaction records, ledgers, cards and the account graph that ties
//! an owner's ledgers and cards together.

pub mod account;
pub mod card;
pub mod ids;
pub mod ledger;
pub mod money;
pub mod transaction;

pub use account::{Accrual, AccountError, AccountGraph};
pub use card::{Card, CardType, CardValidationError};
pub use ids::{AccountId, LedgerId, TransactionId};
pub use ledger::{default_interest_rate, Ledger, LedgerError, LedgerKind};
pub use money::{Money, MoneyParseError};
pub use transaction::{categories, Direction, Transaction, TransactionError};
