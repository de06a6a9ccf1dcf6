//! Card model
//!
//! A card owns no money. It names the ledger it draws on by `LedgerId`; the
//! account graph resolves that id whenever the card is used.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::LedgerId;

/// Type of payment card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    #[default]
    Debit,
    Credit,
}

impl CardType {
    /// Parse card type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Some(Self::Debit),
            "credit" | "credit_card" | "creditcard" => Some(Self::Credit),
            _ => None,
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debit => write!(f, "Debit"),
            Self::Credit => write!(f, "Credit"),
        }
    }
}

/// A card bound to a ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    number: String,
    card_type: CardType,
    ledger_id: LedgerId,
}

impl Card {
    /// Create a card; the number must be non-empty and made of digits
    pub fn new(
        number: impl Into<String>,
        card_type: CardType,
        ledger_id: LedgerId,
    ) -> Result<Self, CardValidationError> {
        let number: String = number.into();
        let number = number.trim();

        if number.is_empty() {
            return Err(CardValidationError::EmptyNumber);
        }
        if !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(CardValidationError::NonDigitNumber(number.to_string()));
        }

        Ok(Self {
            number: number.to_string(),
            card_type,
            ledger_id,
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn card_type(&self) -> CardType {
        self.card_type
    }

    /// The ledger this card draws on
    pub fn ledger_id(&self) -> LedgerId {
        self.ledger_id
    }

    /// Card number with all but the last four digits hidden
    pub fn masked_number(&self) -> String {
        let visible = self.number.len().saturating_sub(4);
        format!("{}{}", "*".repeat(visible), &self.number[visible..])
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.masked_number(), self.card_type)
    }
}

/// Validation errors for cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    EmptyNumber,
    NonDigitNumber(String),
}

impl fmt::Display for CardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyNumber => write!(f, "Card number cannot be empty"),
            Self::NonDigitNumber(n) => write!(f, "Card number must be digits only: '{}'", n),
        }
    }
}

impl std::error::Error for CardValidationError {}
