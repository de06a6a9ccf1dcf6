//! Reports module for pocket-ledger
//!
//! Period windows, spending reports with top-N rankings, and the plain-text
//! report files they are saved to.

pub mod period;
pub mod sink;
pub mod spending;

pub use period::{weekday_from_index, PeriodParseError, ReportPeriod, ReportWindow};
pub use sink::{load_report, render_category_totals, save_report};
pub use spending::SpendingReport;
