//! CLI command handlers
//!
//! This module contains the interactive menu and the report commands,
//! bridging clap argument parsing and stdin with the ledger models.

pub mod menu;
pub mod report;

pub use menu::{run_menu, MenuChoice, MenuContext};
pub use report::{handle_report_command, list_reports, ReportCommands};
