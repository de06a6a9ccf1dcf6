//! Account graph model
//!
//! An account belongs to one owner and owns that owner's ledgers and cards.
//! Cards hold only a `LedgerId`; card operations are resolved here and
//! forwarded to the linked ledger, whose result is passed back unchanged.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use super::card::{Card, CardType, CardValidationError};
use super::ids::{AccountId, LedgerId};
use super::ledger::{Ledger, LedgerError, LedgerKind};
use super::money::Money;
use super::transaction::Transaction;

/// Reasons the account graph declines an operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Owner name cannot be empty")]
    EmptyOwner,

    #[error("Ledger not found: {0}")]
    LedgerNotFound(LedgerId),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Card already exists: {0}")]
    DuplicateCard(String),

    #[error("Invalid card: {0}")]
    InvalidCard(#[from] CardValidationError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Interest credited to one savings ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accrual {
    pub ledger_id: LedgerId,
    pub transaction: Transaction,
}

/// An owner's account with its ledgers and cards
#[derive(Debug, Clone)]
pub struct AccountGraph {
    id: AccountId,
    owner: String,
    ledgers: Vec<Ledger>,
    cards: Vec<Card>,
}

impl AccountGraph {
    /// Create an empty account for an owner
    pub fn new(owner: impl Into<String>) -> Result<Self, AccountError> {
        let owner: String = owner.into();
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(AccountError::EmptyOwner);
        }

        Ok(Self {
            id: AccountId::new(),
            owner: owner.to_string(),
            ledgers: Vec::new(),
            cards: Vec::new(),
        })
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Ledgers in creation order
    pub fn ledgers(&self) -> &[Ledger] {
        &self.ledgers
    }

    /// Cards in creation order
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Open a standard ledger owned by this account
    pub fn add_ledger(&mut self, name: impl Into<String>) -> LedgerId {
        self.insert_ledger(Ledger::new(name))
    }

    /// Open a savings ledger owned by this account
    pub fn add_savings_ledger(
        &mut self,
        name: impl Into<String>,
        rate: Decimal,
    ) -> Result<LedgerId, AccountError> {
        let ledger = Ledger::savings(name, rate)?;
        Ok(self.insert_ledger(ledger))
    }

    /// Open a ledger of any kind with an explicit creation time
    pub fn add_ledger_with_kind(
        &mut self,
        name: impl Into<String>,
        kind: LedgerKind,
        created_at: DateTime<Utc>,
    ) -> Result<LedgerId, AccountError> {
        let ledger = Ledger::with_kind(name, kind, created_at)?;
        Ok(self.insert_ledger(ledger))
    }

    fn insert_ledger(&mut self, ledger: Ledger) -> LedgerId {
        let id = ledger.id();
        debug!("account {}: opened ledger {}", self.id, ledger);
        self.ledgers.push(ledger);
        id
    }

    pub fn ledger(&self, id: LedgerId) -> Option<&Ledger> {
        self.ledgers.iter().find(|l| l.id() == id)
    }

    pub fn ledger_mut(&mut self, id: LedgerId) -> Option<&mut Ledger> {
        self.ledgers.iter_mut().find(|l| l.id() == id)
    }

    /// Look up a ledger, failing with `LedgerNotFound`
    pub fn require_ledger(&self, id: LedgerId) -> Result<&Ledger, AccountError> {
        self.ledger(id).ok_or(AccountError::LedgerNotFound(id))
    }

    fn require_ledger_mut(&mut self, id: LedgerId) -> Result<&mut Ledger, AccountError> {
        self.ledger_mut(id).ok_or(AccountError::LedgerNotFound(id))
    }

    /// Issue a card bound to an existing ledger
    ///
    /// No ledger is created; the card only references `ledger_id`.
    pub fn add_card(
        &mut self,
        number: impl Into<String>,
        card_type: CardType,
        ledger_id: LedgerId,
    ) -> Result<&Card, AccountError> {
        self.require_ledger(ledger_id)?;
        let card = Card::new(number, card_type, ledger_id)?;

        if self.card(card.number()).is_some() {
            return Err(AccountError::DuplicateCard(card.number().to_string()));
        }

        debug!("account {}: issued card {} on {}", self.id, card, ledger_id);
        self.cards.push(card);
        Ok(&self.cards[self.cards.len() - 1])
    }

    pub fn card(&self, number: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.number() == number.trim())
    }

    /// The ledger a card draws on
    pub fn card_ledger(&self, number: &str) -> Result<&Ledger, AccountError> {
        let ledger_id = self.card_ledger_id(number)?;
        self.require_ledger(ledger_id)
    }

    fn card_ledger_id(&self, number: &str) -> Result<LedgerId, AccountError> {
        self.card(number)
            .map(Card::ledger_id)
            .ok_or_else(|| AccountError::CardNotFound(number.trim().to_string()))
    }

    /// Deposit through a card into its linked ledger
    pub fn card_deposit(
        &mut self,
        number: &str,
        amount: Money,
    ) -> Result<Transaction, AccountError> {
        let ledger_id = self.card_ledger_id(number)?;
        Ok(self.require_ledger_mut(ledger_id)?.deposit(amount)?)
    }

    /// Withdraw through a card from its linked ledger
    pub fn card_withdraw(
        &mut self,
        number: &str,
        amount: Money,
    ) -> Result<Transaction, AccountError> {
        let ledger_id = self.card_ledger_id(number)?;
        Ok(self.require_ledger_mut(ledger_id)?.withdraw(amount)?)
    }

    /// Pay with a card under a spending category
    pub fn card_spend(
        &mut self,
        number: &str,
        amount: Money,
        category: &str,
    ) -> Result<Transaction, AccountError> {
        let ledger_id = self.card_ledger_id(number)?;
        Ok(self.require_ledger_mut(ledger_id)?.spend(amount, category)?)
    }

    /// Credit one month of interest to every savings ledger
    pub fn apply_interest_to_savings_ledgers(&mut self) -> Vec<Accrual> {
        self.apply_interest_to_savings_ledgers_at(Utc::now())
    }

    /// Credit one month of interest to every savings ledger, stamped at `at`
    ///
    /// Standard ledgers are skipped. A savings ledger whose interest rounds to
    /// zero produces no accrual.
    pub fn apply_interest_to_savings_ledgers_at(&mut self, at: DateTime<Utc>) -> Vec<Accrual> {
        let mut accruals = Vec::new();

        for ledger in &mut self.ledgers {
            if !ledger.kind().is_savings() {
                continue;
            }

            match ledger.apply_monthly_interest_at(at) {
                Ok(Some(transaction)) => accruals.push(Accrual {
                    ledger_id: ledger.id(),
                    transaction,
                }),
                Ok(None) => {}
                Err(e) => warn!(
                    "account {}: interest skipped for {}: {}",
                    self.id,
                    ledger.name(),
                    e
                ),
            }
        }

        accruals
    }

    /// Sum of all ledger balances
    pub fn total_balance(&self) -> Money {
        self.ledgers.iter().map(Ledger::balance).sum()
    }
}

impl fmt::Display for AccountGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} ledgers, {} cards)",
            self.owner,
            self.ledgers.len(),
            self.cards.len()
        )
    }
}
