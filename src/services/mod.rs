//! Service layer for pocket-ledger
//!
//! Logic that works across ledgers: aggregation over transaction snapshots
//! and the monthly interest schedule.

pub mod aggregate;
pub mod interest;

pub use aggregate::{
    category_summaries, category_totals, filter_by_window, outflows, top_n_categories,
    top_n_transactions, CategoryTotal,
};
pub use interest::{months_elapsed, InterestScheduler};
