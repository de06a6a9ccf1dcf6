//! Spending Report
//!
//! Category totals and top-N rankings for one time window.

use std::collections::BTreeMap;

use crate::models::{Money, Transaction};
use crate::services::aggregate::{
    category_totals, filter_by_window, outflows, top_n_categories, top_n_transactions,
    CategoryTotal,
};

use super::period::ReportWindow;
use super::sink::render_category_totals;

/// Spending Report
#[derive(Debug, Clone)]
pub struct SpendingReport {
    /// Window the report covers
    pub window: ReportWindow,
    /// Sum per category of every transaction in the window
    pub category_totals: BTreeMap<String, Money>,
    /// Largest outflows, largest first
    pub top_transactions: Vec<Transaction>,
    /// Outflow categories with the largest totals, largest first
    pub top_categories: Vec<CategoryTotal>,
    /// Total deposited in the window
    pub total_inflow: Money,
    /// Total withdrawn or spent in the window
    pub total_outflow: Money,
    /// Number of transactions in the window
    pub transaction_count: usize,
}

impl SpendingReport {
    /// Generate a report from a ledger snapshot
    pub fn generate(transactions: &[Transaction], window: ReportWindow, top_n: usize) -> Self {
        let in_window = filter_by_window(transactions, window.start, window.end);
        let spending = outflows(&in_window);

        let total_outflow: Money = spending.iter().map(Transaction::amount).sum();
        let total_inflow: Money = in_window
            .iter()
            .filter(|t| t.is_inflow())
            .map(Transaction::amount)
            .sum();

        Self {
            window,
            category_totals: category_totals(&in_window),
            top_transactions: top_n_transactions(&spending, top_n),
            top_categories: top_n_categories(&spending, top_n),
            total_inflow,
            total_outflow,
            transaction_count: in_window.len(),
        }
    }

    /// One `Category: <name>, spent: <total>` line per category
    pub fn report_lines(&self) -> Vec<String> {
        render_category_totals(&self.category_totals)
    }

    /// Ranking lines for the top transactions and top categories
    pub fn ranking_lines(&self) -> Vec<String> {
        let transactions = self.top_transactions.iter().enumerate().map(|(i, t)| {
            format!(
                "Top transaction #{}: {}, amount: {}, at: {}",
                i + 1,
                t.category(),
                t.amount(),
                t.timestamp().format("%Y-%m-%d %H:%M:%S")
            )
        });
        let categories = self.top_categories.iter().enumerate().map(|(i, c)| {
            format!(
                "Top category #{}: {}, spent: {}",
                i + 1,
                c.category,
                c.total
            )
        });

        transactions.chain(categories).collect()
    }

    /// Category total lines followed by ranking lines, as saved to a file
    pub fn file_lines(&self) -> Vec<String> {
        let mut lines = self.report_lines();
        lines.extend(self.ranking_lines());
        lines
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Spending Report: {}\n", self.window));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Total In:  {}\n",
            self.total_inflow.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!(
            "Total Out: {}\n",
            self.total_outflow.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!("Transactions: {}\n\n", self.transaction_count));

        if self.category_totals.is_empty() {
            output.push_str("No transactions in this period.\n");
            return output;
        }

        output.push_str(&format!("{:<30} {:>14}\n", "Category", "Amount"));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for (category, total) in &self.category_totals {
            output.push_str(&format!(
                "{:<30} {:>14}\n",
                category,
                total.format_with_symbol(currency_symbol)
            ));
        }

        if !self.top_transactions.is_empty() {
            output.push('\n');
            for line in self.ranking_lines() {
                output.push_str(&line);
                output.push('\n');
            }
        }

        output
    }
}
