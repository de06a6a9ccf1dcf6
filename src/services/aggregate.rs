//! Aggregation over transaction snapshots
//!
//! Pure functions: they read a slice of transactions and return new values,
//! never touching a ledger. Empty input gives empty output and `n = 0` gives
//! an empty ranking. Totals saturate at the ends of the cents range.

use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::models::{Money, Transaction};

/// Total and count of transactions for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub transaction_count: usize,
}

/// Sum of amounts per category
pub fn category_totals(transactions: &[Transaction]) -> BTreeMap<String, Money> {
    transactions.iter().fold(BTreeMap::new(), |mut totals, txn| {
        let total = totals
            .entry(txn.category().to_string())
            .or_insert_with(Money::zero);
        *total = total.saturating_add(txn.amount());
        totals
    })
}

/// Per-category totals with transaction counts, in category name order
pub fn category_summaries(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut summaries: BTreeMap<&str, (Money, usize)> = BTreeMap::new();
    for txn in transactions {
        let entry = summaries
            .entry(txn.category())
            .or_insert((Money::zero(), 0));
        entry.0 = entry.0.saturating_add(txn.amount());
        entry.1 += 1;
    }

    summaries
        .into_iter()
        .map(|(category, (total, transaction_count))| CategoryTotal {
            category: category.to_string(),
            total,
            transaction_count,
        })
        .collect()
}

/// Transactions with `start <= timestamp <= end`, order preserved
pub fn filter_by_window(
    transactions: &[Transaction],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.in_window(start, end))
        .cloned()
        .collect()
}

/// Only the transactions that take money out of a ledger
pub fn outflows(transactions: &[Transaction]) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.is_outflow())
        .cloned()
        .collect()
}

/// The `n` largest transactions, largest first
///
/// Equal amounts rank the earlier timestamp first; records that tie on both
/// keep their input order.
pub fn top_n_transactions(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut ranked: Vec<&Transaction> = transactions.iter().collect();
    ranked.sort_by_key(|t| (Reverse(t.amount()), t.timestamp()));
    ranked.into_iter().take(n).cloned().collect()
}

/// The `n` categories with the largest totals, largest first
///
/// Equal totals rank by category name.
pub fn top_n_categories(transactions: &[Transaction], n: usize) -> Vec<CategoryTotal> {
    let mut ranked = category_summaries(transactions);
    ranked.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn txn(category: &str, amount: i64, secs: i64) -> Transaction {
        Transaction::new(Money::from_units_cents(amount, 0), category, at(secs)).unwrap()
    }

    #[test]
    fn test_category_totals() {
        let txns = vec![
            txn("Purchase", 20, 0),
            txn("Purchase", 30, 1),
            txn("Utility", 25, 2),
        ];

        let totals = category_totals(&txns);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["Purchase"], Money::from_cents(5_000));
        assert_eq!(totals["Utility"], Money::from_cents(2_500));

        let top = top_n_categories(&txns, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].category, "Purchase");
        assert_eq!(top[0].transaction_count, 2);
    }

    #[test]
    fn test_totals_saturate_on_huge_history() {
        use crate::models::Ledger;

        let big = Money::from_cents(i64::MAX - 10);
        let mut ledger = Ledger::new("Checking");
        ledger.deposit_at(big, at(0)).unwrap();
        ledger.withdraw_at(big, at(1)).unwrap();
        ledger.deposit_at(big, at(2)).unwrap();

        let totals = category_totals(ledger.all_transactions());
        assert_eq!(totals["Deposit"], Money::from_cents(i64::MAX));
        assert_eq!(totals["Withdrawal"], big);

        let top = top_n_categories(ledger.all_transactions(), 1);
        assert_eq!(top[0].category, "Deposit");
        assert_eq!(top[0].total, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_empty_input() {
        assert!(category_totals(&[]).is_empty());
        assert!(filter_by_window(&[], at(0), at(10)).is_empty());
        assert!(top_n_transactions(&[], 3).is_empty());
        assert!(top_n_categories(&[], 3).is_empty());
    }

    #[test]
    fn test_zero_n() {
        let txns = vec![txn("Purchase", 20, 0)];
        assert!(top_n_transactions(&txns, 0).is_empty());
        assert!(top_n_categories(&txns, 0).is_empty());
    }

    #[test]
    fn test_n_larger_than_population() {
        let txns = vec![txn("Purchase", 20, 0), txn("Utility", 5, 1)];
        assert_eq!(top_n_transactions(&txns, 10).len(), 2);
        assert_eq!(top_n_categories(&txns, 10).len(), 2);
    }

    #[test]
    fn test_top_transactions_tie_breaks_by_earliest() {
        let late = txn("Purchase", 5, 20);
        let early = txn("Purchase", 5, 10);
        let small = txn("Purchase", 3, 0);
        let txns = vec![late.clone(), small, early.clone()];

        let top = top_n_transactions(&txns, 2);
        assert_eq!(top, vec![early, late]);
    }

    #[test]
    fn test_top_transactions_is_idempotent() {
        let txns: Vec<_> = [7, 3, 9, 3, 1, 9, 4]
            .iter()
            .enumerate()
            .map(|(i, amount)| txn("Purchase", *amount, i as i64))
            .collect();

        for n in 0..=txns.len() + 1 {
            let once = top_n_transactions(&txns, n);
            assert_eq!(once.len(), n.min(txns.len()));
            assert_eq!(top_n_transactions(&once, n), once);
        }
    }

    #[test]
    fn test_top_categories_tie_breaks_by_name() {
        let txns = vec![
            txn("Zoo", 10, 0),
            txn("Books", 10, 1),
            txn("Food", 4, 2),
            txn("Food", 6, 3),
        ];

        let names: Vec<_> = top_n_categories(&txns, 3)
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(names, vec!["Books", "Food", "Zoo"]);
        assert_eq!(top_n_categories(&txns, 3), top_n_categories(&txns, 3));
    }

    #[test]
    fn test_filter_by_window_preserves_order() {
        let txns = vec![
            txn("A", 1, 0),
            txn("B", 2, 5),
            txn("C", 3, 10),
            txn("D", 4, 15),
        ];

        let window: Vec<_> = filter_by_window(&txns, at(5), at(10))
            .iter()
            .map(|t| t.category().to_string())
            .collect();
        assert_eq!(window, vec!["B", "C"]);
        assert!(filter_by_window(&txns, at(10), at(5)).is_empty());
    }

    #[test]
    fn test_outflows_drop_deposits() {
        let txns = vec![
            txn("Deposit", 100, 0),
            txn("Withdrawal", 10, 1),
            txn("Purchase", 5, 2),
        ];
        let out = outflows(&txns);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|t| t.category() != "Deposit"));
    }
}
