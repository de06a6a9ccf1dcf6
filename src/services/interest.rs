//! Monthly interest scheduling
//!
//! Ledgers only know how to apply one accrual. This scheduler decides how
//! many accruals are owed: one per calendar month boundary crossed since the
//! savings ledger was created. The caller supplies `now`, so nothing here
//! reads the clock.

use chrono::{DateTime, Datelike, Utc};
use log::{info, warn};
use std::collections::HashMap;

use crate::models::{Accrual, AccountGraph, LedgerId};

/// Number of calendar month boundaries between `created_at` and `now` (UTC)
///
/// A ledger created on 31 January has one elapsed month on 1 February.
pub fn months_elapsed(created_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    if now <= created_at {
        return 0;
    }

    let months = (now.year() - created_at.year()) * 12 + now.month() as i32
        - created_at.month() as i32;
    u32::try_from(months).unwrap_or(0)
}

/// Tracks how many monthly accruals each savings ledger has received
#[derive(Debug, Default)]
pub struct InterestScheduler {
    applied: HashMap<LedgerId, u32>,
}

impl InterestScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accruals already applied to a ledger
    pub fn applied(&self, ledger_id: LedgerId) -> u32 {
        self.applied.get(&ledger_id).copied().unwrap_or(0)
    }

    /// Accruals owed to each savings ledger of the account at `now`
    pub fn due(&self, account: &AccountGraph, now: DateTime<Utc>) -> Vec<(LedgerId, u32)> {
        account
            .ledgers()
            .iter()
            .filter(|l| l.kind().is_savings())
            .map(|l| {
                let owed = months_elapsed(l.created_at(), now)
                    .saturating_sub(self.applied(l.id()));
                (l.id(), owed)
            })
            .filter(|(_, owed)| *owed > 0)
            .collect()
    }

    /// Apply every accrual owed at `now`, one per elapsed month
    ///
    /// A month counts as handled even when its interest rounds to zero. If a
    /// ledger rejects an accrual, its remaining months stay owed.
    pub fn catch_up(&mut self, account: &mut AccountGraph, now: DateTime<Utc>) -> Vec<Accrual> {
        let mut accruals = Vec::new();

        for (ledger_id, owed) in self.due(account, now) {
            let Some(ledger) = account.ledger_mut(ledger_id) else {
                continue;
            };

            for _ in 0..owed {
                match ledger.apply_monthly_interest_at(now) {
                    Ok(accrued) => {
                        *self.applied.entry(ledger_id).or_insert(0) += 1;
                        if let Some(transaction) = accrued {
                            accruals.push(Accrual {
                                ledger_id,
                                transaction,
                            });
                        }
                    }
                    Err(e) => {
                        warn!("interest for {} postponed: {}", ledger.name(), e);
                        break;
                    }
                }
            }
        }

        if !accruals.is_empty() {
            info!("applied {} monthly interest accruals", accruals.len());
        }
        accruals
    }

    /// Credit one accrual to every savings ledger at `now`, ahead of schedule
    ///
    /// The accrual counts as the next owed month, so `catch_up` skips that
    /// month when it comes due.
    pub fn apply_now(&mut self, account: &mut AccountGraph, now: DateTime<Utc>) -> Vec<Accrual> {
        let savings: Vec<LedgerId> = account
            .ledgers()
            .iter()
            .filter(|l| l.kind().is_savings())
            .map(|l| l.id())
            .collect();

        let accruals = account.apply_interest_to_savings_ledgers_at(now);
        for ledger_id in savings {
            *self.applied.entry(ledger_id).or_insert(0) += 1;
        }
        accruals
    }
}
