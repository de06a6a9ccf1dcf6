//! Interactive menu
//!
//! Reads one choice per line and prompts for whatever the choice needs. All
//! state lives in a `MenuContext` owned by the caller, so the loop can be
//! driven from stdin or from an in-memory buffer.

use std::io::{BufRead, Write};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::config::{PocketPaths, Settings};
use crate::error::{PocketError, PocketResult};
use crate::models::{
    categories, Accrual, AccountError, AccountGraph, CardType, Ledger, LedgerId, Money,
    Transaction,
};
use crate::reports::{load_report, save_report, ReportPeriod, SpendingReport};
use crate::services::InterestScheduler;

/// A menu entry, numbered from 1 in the order of `MenuChoice::ALL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddTransaction,
    GenerateReport,
    SaveReport,
    LoadReport,
    Deposit,
    Withdraw,
    Balance,
    Exit,
    RecordSpending,
    Rankings,
    ApplyInterest,
    ListTransactions,
}

impl MenuChoice {
    pub const ALL: [(Self, &'static str); 12] = [
        (Self::AddTransaction, "Add transaction"),
        (Self::GenerateReport, "Generate report"),
        (Self::SaveReport, "Save report"),
        (Self::LoadReport, "Load report"),
        (Self::Deposit, "Deposit"),
        (Self::Withdraw, "Withdraw"),
        (Self::Balance, "Get balance"),
        (Self::Exit, "Exit"),
        (Self::RecordSpending, "Record spending"),
        (Self::Rankings, "Show rankings"),
        (Self::ApplyInterest, "Apply interest"),
        (Self::ListTransactions, "List transactions"),
    ];

    /// Parse the option number typed at the prompt
    pub fn parse(s: &str) -> Option<Self> {
        let number: usize = s.trim().parse().ok()?;
        Self::ALL
            .get(number.checked_sub(1)?)
            .map(|(choice, _)| *choice)
    }
}

/// Everything the menu operates on
#[derive(Debug)]
pub struct MenuContext {
    account: AccountGraph,
    card_number: String,
    checking: LedgerId,
    savings: Option<LedgerId>,
    settings: Settings,
    paths: PocketPaths,
    scheduler: InterestScheduler,
    last_report: Option<SpendingReport>,
}

impl MenuContext {
    /// Open the owner's account with a checking ledger and its card
    ///
    /// With `with_savings`, a savings ledger earning `settings.interest_rate`
    /// is opened as well.
    pub fn new(settings: Settings, paths: PocketPaths, with_savings: bool) -> PocketResult<Self> {
        let mut account = AccountGraph::new(settings.owner_name.as_str())?;
        let checking = account.add_ledger("Checking");
        account.add_card(settings.card_number.as_str(), CardType::Debit, checking)?;

        let savings = if with_savings {
            Some(account.add_savings_ledger("Savings", settings.interest_rate)?)
        } else {
            None
        };

        info!("menu session opened for {}", account);
        Ok(Self {
            account,
            card_number: settings.card_number.trim().to_string(),
            checking,
            savings,
            settings,
            paths,
            scheduler: InterestScheduler::new(),
            last_report: None,
        })
    }

    pub fn account(&self) -> &AccountGraph {
        &self.account
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn checking_ledger(&self) -> Option<&Ledger> {
        self.account.ledger(self.checking)
    }

    pub fn savings_ledger(&self) -> Option<&Ledger> {
        self.savings.and_then(|id| self.account.ledger(id))
    }

    /// Transactions of every ledger, oldest first
    pub fn transactions(&self) -> Vec<Transaction> {
        let mut all: Vec<Transaction> = self
            .account
            .ledgers()
            .iter()
            .flat_map(|l| l.all_transactions().iter().cloned())
            .collect();
        all.sort_by_key(Transaction::timestamp);
        all
    }

    /// Spending report for the period containing `now`
    pub fn report(&self, period: ReportPeriod, now: DateTime<Utc>) -> SpendingReport {
        let window = period.window(now.date_naive(), self.settings.week_start());
        SpendingReport::generate(&self.transactions(), window, self.settings.top_n)
    }

    /// Apply the monthly interest owed to savings ledgers at `now`
    pub fn accrue_interest(&mut self, now: DateTime<Utc>) -> Vec<Accrual> {
        self.scheduler.catch_up(&mut self.account, now)
    }

    /// Credit one month of interest now, counted against the schedule
    pub fn apply_interest_now(&mut self, now: DateTime<Utc>) -> Vec<Accrual> {
        self.scheduler.apply_now(&mut self.account, now)
    }

    fn checking_mut(&mut self) -> PocketResult<&mut Ledger> {
        let id = self.checking;
        self.account
            .ledger_mut(id)
            .ok_or(PocketError::Account(AccountError::LedgerNotFound(id)))
    }

    fn ledger_name(&self, id: LedgerId) -> &str {
        self.account.ledger(id).map_or("?", Ledger::name)
    }
}

/// Run the menu until the user exits or the input ends
///
/// Declined operations and unreadable files are reported on `output` and the
/// loop continues. Only failures to write to `output` end the loop early.
pub fn run_menu<R: BufRead, W: Write>(
    ctx: &mut MenuContext,
    input: R,
    output: W,
) -> PocketResult<()> {
    Session { ctx, input, output }.run()
}

struct Session<'a, R, W> {
    ctx: &'a mut MenuContext,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<'_, R, W> {
    fn run(&mut self) -> PocketResult<()> {
        loop {
            self.accrue(Utc::now())?;
            self.print_menu()?;

            let Some(line) = self.prompt("Choose option: ")? else {
                writeln!(self.output)?;
                writeln!(self.output, "Exiting program.")?;
                return Ok(());
            };

            let Some(choice) = MenuChoice::parse(&line) else {
                writeln!(self.output, "Invalid option. Please try again.")?;
                continue;
            };

            if choice == MenuChoice::Exit {
                writeln!(self.output, "Exiting program.")?;
                return Ok(());
            }

            debug!("menu choice {:?}", choice);
            if let Err(e) = self.dispatch(choice) {
                if e.is_rejection() {
                    debug!("menu choice {:?} declined: {}", choice, e);
                } else {
                    warn!("menu choice {:?} failed: {}", choice, e);
                }
                writeln!(self.output, "Error: {}", e)?;
            }
        }
    }

    fn print_menu(&mut self) -> PocketResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Pocket Ledger")?;
        for (number, (_, label)) in MenuChoice::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", number + 1, label)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> PocketResult<()> {
        match choice {
            MenuChoice::AddTransaction => self.add_transaction(),
            MenuChoice::GenerateReport => self.generate_report(),
            MenuChoice::SaveReport => self.save_report(),
            MenuChoice::LoadReport => self.load_report(),
            MenuChoice::Deposit => self.deposit(),
            MenuChoice::Withdraw => self.withdraw(),
            MenuChoice::Balance => self.balance(),
            MenuChoice::RecordSpending => self.record_spending(),
            MenuChoice::Rankings => self.rankings(),
            MenuChoice::ApplyInterest => self.apply_interest(),
            MenuChoice::ListTransactions => self.list_transactions(),
            MenuChoice::Exit => Ok(()),
        }
    }

    /// Write a prompt and read one trimmed line; `None` at end of input
    fn prompt(&mut self, text: &str) -> PocketResult<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_amount(&mut self, text: &str) -> PocketResult<Option<Money>> {
        let Some(raw) = self.prompt(text)? else {
            return Ok(None);
        };
        Money::parse(&raw)
            .map(Some)
            .map_err(|e| PocketError::Validation(e.to_string()))
    }

    fn prompt_period(&mut self) -> PocketResult<Option<ReportPeriod>> {
        let Some(raw) = self.prompt("Report period (day/week/month/all) [month]: ")? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(Some(ReportPeriod::default()));
        }
        ReportPeriod::parse(&raw)
            .map(Some)
            .map_err(|e| PocketError::Validation(e.to_string()))
    }

    fn prompt_filename(&mut self, text: &str) -> PocketResult<Option<String>> {
        match self.prompt(text)? {
            Some(name) if name.is_empty() => {
                Err(PocketError::Validation("Filename cannot be empty".into()))
            }
            other => Ok(other),
        }
    }

    fn accrue(&mut self, now: DateTime<Utc>) -> PocketResult<()> {
        let accruals = self.ctx.accrue_interest(now);
        self.print_accruals(&accruals)
    }

    fn print_accruals(&mut self, accruals: &[Accrual]) -> PocketResult<()> {
        for accrual in accruals {
            let name = self.ctx.ledger_name(accrual.ledger_id).to_string();
            let amount = self.money(accrual.transaction.amount());
            writeln!(self.output, "Interest credited to {}: {}", name, amount)?;
        }
        Ok(())
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.ctx.settings.currency_symbol)
    }

    fn add_transaction(&mut self) -> PocketResult<()> {
        let Some(amount) = self.prompt_amount("Enter amount: ")? else {
            return Ok(());
        };
        let Some(category) = self.prompt("Enter category (Deposit or Withdrawal): ")? else {
            return Ok(());
        };

        let txn = Transaction::now(amount, category)?;
        let recorded = self.ctx.checking_mut()?.record_historical_transaction(txn)?;
        writeln!(self.output, "Transaction added: {}", recorded)?;
        Ok(())
    }

    fn generate_report(&mut self) -> PocketResult<()> {
        let Some(period) = self.prompt_period()? else {
            return Ok(());
        };

        let report = self.ctx.report(period, Utc::now());
        write!(
            self.output,
            "{}",
            report.format_terminal(&self.ctx.settings.currency_symbol)
        )?;
        self.ctx.last_report = Some(report);
        Ok(())
    }

    fn save_report(&mut self) -> PocketResult<()> {
        let Some(name) = self.prompt_filename("Enter filename to save report: ")? else {
            return Ok(());
        };

        // Without a generated report, save the all-time report
        let lines = match &self.ctx.last_report {
            Some(report) => report.file_lines(),
            None => self.ctx.report(ReportPeriod::All, Utc::now()).file_lines(),
        };

        let path = self.ctx.paths.report_file(&name);
        save_report(&path, &lines)?;
        writeln!(self.output, "Report saved to {}", path.display())?;
        Ok(())
    }

    fn load_report(&mut self) -> PocketResult<()> {
        let Some(name) = self.prompt_filename("Enter filename to load report from: ")? else {
            return Ok(());
        };

        let path = self.ctx.paths.report_file(&name);
        for line in load_report(&path)? {
            writeln!(self.output, "{}", line)?;
        }
        writeln!(self.output, "Report loaded from {}", path.display())?;
        Ok(())
    }

    fn deposit(&mut self) -> PocketResult<()> {
        let Some(amount) = self.prompt_amount("Enter deposit amount: ")? else {
            return Ok(());
        };

        let card = self.ctx.card_number.clone();
        self.ctx.account.card_deposit(&card, amount)?;
        writeln!(self.output, "Deposit successful through card")?;
        Ok(())
    }

    fn withdraw(&mut self) -> PocketResult<()> {
        let Some(amount) = self.prompt_amount("Enter withdrawal amount: ")? else {
            return Ok(());
        };

        let card = self.ctx.card_number.clone();
        self.ctx.account.card_withdraw(&card, amount)?;
        writeln!(self.output, "Withdrawal successful through card")?;
        Ok(())
    }

    fn balance(&mut self) -> PocketResult<()> {
        let checking = self.ctx.checking_ledger().map(Ledger::balance);
        let balance = self.money(checking.unwrap_or_default());
        writeln!(self.output, "Balance: {}", balance)?;

        if let Some(savings) = self.ctx.savings_ledger().map(Ledger::balance) {
            let savings = self.money(savings);
            writeln!(self.output, "Savings balance: {}", savings)?;
        }
        Ok(())
    }

    fn record_spending(&mut self) -> PocketResult<()> {
        let Some(amount) = self.prompt_amount("Enter amount spent: ")? else {
            return Ok(());
        };
        let Some(category) = self.prompt("Enter category [Purchase]: ")? else {
            return Ok(());
        };
        let category = if category.is_empty() {
            categories::PURCHASE.to_string()
        } else {
            category
        };

        let card = self.ctx.card_number.clone();
        let txn = self.ctx.account.card_spend(&card, amount, &category)?;
        writeln!(self.output, "Spending recorded: {}", txn)?;
        Ok(())
    }

    fn rankings(&mut self) -> PocketResult<()> {
        let Some(period) = self.prompt_period()? else {
            return Ok(());
        };

        let lines = self.ctx.report(period, Utc::now()).ranking_lines();
        if lines.is_empty() {
            writeln!(self.output, "No spending in this period.")?;
        }
        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    fn apply_interest(&mut self) -> PocketResult<()> {
        if self.ctx.savings.is_none() {
            writeln!(
                self.output,
                "No savings ledger. Start the menu with --savings."
            )?;
            return Ok(());
        }

        let accruals = self.ctx.apply_interest_now(Utc::now());
        if accruals.is_empty() {
            writeln!(self.output, "No interest credited.")?;
        }
        self.print_accruals(&accruals)
    }

    fn list_transactions(&mut self) -> PocketResult<()> {
        for ledger in self.ctx.account.ledgers() {
            writeln!(self.output, "{}", ledger)?;
            if ledger.all_transactions().is_empty() {
                writeln!(self.output, "  (no transactions)")?;
            }
            for txn in ledger.all_transactions() {
                writeln!(self.output, "  {} {}", txn.id(), txn)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::months_elapsed;
    use chrono::Duration;
    use tempfile::TempDir;

    fn context(temp_dir: &TempDir, with_savings: bool) -> MenuContext {
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        MenuContext::new(Settings::default(), paths, with_savings).unwrap()
    }

    fn drive(ctx: &mut MenuContext, input: &str) -> String {
        let mut output = Vec::new();
        run_menu(ctx, input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::AddTransaction));
        assert_eq!(MenuChoice::parse(" 8 "), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("12"), Some(MenuChoice::ListTransactions));
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("13"), None);
        assert_eq!(MenuChoice::parse("deposit"), None);
    }

    #[test]
    fn test_deposit_withdraw_balance() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, false);

        let out = drive(&mut ctx, "5\n100\n6\n25.50\n7\n8\n");

        assert!(out.contains("Deposit successful through card"));
        assert!(out.contains("Withdrawal successful through card"));
        assert!(out.contains("Balance: $74.50"));
        assert!(out.ends_with("Exiting program.\n"));
        assert_eq!(ctx.account().total_balance(), Money::from_cents(7_450));
    }

    #[test]
    fn test_declined_withdrawal_keeps_running() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, false);

        let out = drive(&mut ctx, "5\n10\n6\n50\n7\n8\n");

        assert!(out.contains("Error: Insufficient funds: requested 50.00, available 10.00"));
        assert!(out.contains("Balance: $10.00"));
        assert_eq!(ctx.checking_ledger().unwrap().transaction_count(), 1);
    }

    #[test]
    fn test_bad_input_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, false);

        let out = drive(&mut ctx, "99\n5\nabc\n1\n20\nPurchase\n8\n");

        assert!(out.contains("Invalid option. Please try again."));
        assert!(out.contains("Error: Validation error:"));
        assert!(out.contains("Error: Only Deposit and Withdrawal can be replayed"));
        assert!(ctx.transactions().is_empty());
    }

    #[test]
    fn test_add_transaction_replays_deposit() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, false);

        let out = drive(&mut ctx, "1\n40\nDeposit\n1\n15\nWithdrawal\n7\n8\n");

        assert!(out.contains("Transaction added:"));
        assert!(out.contains("Balance: $25.00"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, false);

        let out = drive(&mut ctx, "5\n");

        assert!(out.ends_with("Exiting program.\n"));
        assert!(ctx.transactions().is_empty());
    }

    #[test]
    fn test_report_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, false);

        let out = drive(
            &mut ctx,
            "5\n100\n9\n30\n\n9\n12.50\nUtilityPayment\n2\nall\n3\njan.txt\n4\njan.txt\n8\n",
        );

        assert!(out.contains("Spending Report: all time"));
        assert!(out.contains("Report saved to"));
        assert!(out.contains("Category: Deposit, spent: 100.00"));
        assert!(out.contains("Category: Purchase, spent: 30.00"));
        assert!(out.contains("Category: UtilityPayment, spent: 12.50"));

        let saved = load_report(temp_dir.path().join("reports").join("jan.txt")).unwrap();
        assert_eq!(
            saved[..3],
            [
                "Category: Deposit, spent: 100.00",
                "Category: Purchase, spent: 30.00",
                "Category: UtilityPayment, spent: 12.50",
            ]
        );
        assert!(saved[3].starts_with("Top transaction #1: Purchase, amount: 30.00, at: "));
        assert!(saved[4].starts_with("Top transaction #2: UtilityPayment, amount: 12.50, at: "));
        assert_eq!(
            saved[5..],
            [
                "Top category #1: Purchase, spent: 30.00",
                "Top category #2: UtilityPayment, spent: 12.50",
            ]
        );
    }

    #[test]
    fn test_load_missing_report_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, false);

        let out = drive(&mut ctx, "4\nmissing.txt\n3\n\n8\n");

        assert!(out.contains("Error: Report error: Failed to open file"));
        assert!(out.contains("Error: Validation error: Filename cannot be empty"));
    }

    #[test]
    fn test_rankings() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, false);

        let out = drive(&mut ctx, "10\n\n5\n100\n9\n30\n\n9\n20\nGroceries\n10\nday\n8\n");

        assert!(out.contains("No spending in this period."));
        assert!(out.contains("Top transaction #1: Purchase, amount: 30.00"));
        assert!(out.contains("Top transaction #2: Groceries, amount: 20.00"));
        assert!(out.contains("Top category #1: Purchase, spent: 30.00"));
        assert!(!out.contains("Top transaction #3"));
    }

    #[test]
    fn test_apply_interest_needs_savings() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, false);
        let out = drive(&mut ctx, "11\n8\n");
        assert!(out.contains("No savings ledger."));

        let mut ctx = context(&temp_dir, true);
        let out = drive(&mut ctx, "11\n7\n8\n");
        assert!(out.contains("No interest credited."));
        assert!(out.contains("Savings balance: $0.00"));
    }

    #[test]
    fn test_manual_interest_on_savings() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, true);
        let savings = ctx.savings.unwrap();
        ctx.account
            .ledger_mut(savings)
            .unwrap()
            .deposit(Money::from_cents(100_000))
            .unwrap();

        let out = drive(&mut ctx, "11\n7\n8\n");

        assert!(out.contains("Interest credited to Savings: $50.00"));
        assert!(out.contains("Savings balance: $1050.00"));
    }

    #[test]
    fn test_scheduled_interest_catches_up() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, true);
        let savings = ctx.savings.unwrap();
        ctx.account
            .ledger_mut(savings)
            .unwrap()
            .deposit(Money::from_cents(100_000))
            .unwrap();

        let created = ctx.savings_ledger().unwrap().created_at();
        let later = created + Duration::days(65);
        let owed = months_elapsed(created, later) as usize;

        let accruals = ctx.accrue_interest(later);
        assert_eq!(accruals.len(), owed);
        assert!(accruals.iter().all(|a| a.ledger_id == savings));
        assert!(ctx.accrue_interest(later).is_empty());
        assert!(ctx.checking_ledger().unwrap().all_transactions().is_empty());
    }

    #[test]
    fn test_manual_interest_counts_toward_schedule() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, true);
        let savings = ctx.savings.unwrap();
        ctx.account
            .ledger_mut(savings)
            .unwrap()
            .deposit(Money::from_cents(100_000))
            .unwrap();

        let created = ctx.savings_ledger().unwrap().created_at();
        let later = created + Duration::days(65);
        let owed = months_elapsed(created, later) as usize;

        assert_eq!(ctx.apply_interest_now(created).len(), 1);
        assert_eq!(ctx.accrue_interest(later).len(), owed - 1);
        assert_eq!(
            ctx.savings_ledger().unwrap().all_transactions().len(),
            1 + owed
        );
    }

    #[test]
    fn test_list_transactions() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, true);

        let out = drive(&mut ctx, "12\n5\n10\n12\n8\n");

        assert!(out.contains("Checking [Standard] balance 0.00"));
        assert!(out.contains("  (no transactions)"));
        assert!(out.contains("Deposit 10.00"));
        let deposit = &ctx.checking_ledger().unwrap().all_transactions()[0];
        assert!(out.contains(&format!("  {} {}", deposit.id(), deposit)));
        assert!(out.contains("Savings [Savings (5%)]"));
    }
}
