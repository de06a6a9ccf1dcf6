//! CLI commands for saved reports
//!
//! Reports are written from the interactive menu. These commands read them
//! back without starting a session.

use clap::Subcommand;
use std::fs;

use crate::config::PocketPaths;
use crate::error::{PocketError, PocketResult};
use crate::reports::load_report;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Print a saved report verbatim
    Show {
        /// File name in the reports directory, or a path
        file: String,
    },

    /// List report files in the reports directory
    #[command(alias = "ls")]
    List,
}

/// Handle report commands
pub fn handle_report_command(paths: &PocketPaths, cmd: ReportCommands) -> PocketResult<()> {
    match cmd {
        ReportCommands::Show { file } => {
            let path = paths.report_file(&file);
            for line in load_report(&path)? {
                println!("{}", line);
            }
        }
        ReportCommands::List => {
            let names = list_reports(paths)?;
            if names.is_empty() {
                println!("No saved reports in {}", paths.reports_dir().display());
            }
            for name in names {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

/// File names in the reports directory, sorted
pub fn list_reports(paths: &PocketPaths) -> PocketResult<Vec<String>> {
    let dir = paths.reports_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(&dir).map_err(|e| {
        PocketError::Report(format!("Failed to read {}: {}", dir.display(), e))
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
