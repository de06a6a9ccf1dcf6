//! pocket-ledger - Personal finance ledger with spending reports
//!
//! This library records deposits, withdrawals and purchases against ledgers
//! reached through cards, and derives category totals and top-N rankings
//! over time windows.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Money, transactions, ledgers, cards and the account graph
//! - `services`: Aggregation over transaction slices and interest scheduling
//! - `reports`: Period windows, spending reports and plain-text report files
//! - `config`: Configuration and path management
//! - `cli`: Interactive menu and command handlers
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust
//! use pocket_ledger::models::{AccountGraph, CardType, Money};
//!
//! let mut account = AccountGraph::new("Alice").unwrap();
//! let checking = account.add_ledger("Checking");
//! account.add_card("123456789", CardType::Debit, checking).unwrap();
//!
//! account.card_deposit("123456789", Money::from_cents(10_000)).unwrap();
//! assert_eq!(account.ledger(checking).unwrap().balance(), Money::from_cents(10_000));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;

pub use error::{PocketError, PocketResult};
