use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;

use pocket_ledger::cli::{handle_report_command, run_menu, MenuContext, ReportCommands};
use pocket_ledger::config::{paths::PocketPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "pocket",
    version,
    about = "Personal finance ledger with spending reports",
    long_about = "pocket-ledger records deposits, withdrawals and card purchases, \
                  and reports spending per category with top-N rankings over a \
                  day, week or month."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive menu (default)
    Menu {
        /// Also open a savings ledger that earns monthly interest
        #[arg(short, long)]
        savings: bool,
    },

    /// Saved report commands
    #[command(subcommand)]
    Report(ReportCommands),

    /// Write default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let paths = PocketPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command.unwrap_or(Commands::Menu { savings: false }) {
        Commands::Menu { savings } => {
            let mut context = MenuContext::new(settings, paths, savings)?;
            run_menu(&mut context, io::stdin().lock(), io::stdout().lock())?;
        }
        Commands::Report(cmd) => {
            handle_report_command(&paths, cmd)?;
        }
        Commands::Init => {
            if paths.is_initialized() {
                println!("Already initialized at: {}", paths.base_dir().display());
                println!("Keeping settings in {}", paths.settings_file().display());
                return Ok(());
            }
            println!("Initializing pocket-ledger at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Settings written to {}", paths.settings_file().display());
            println!("Reports will be saved in {}", paths.reports_dir().display());
        }
        Commands::Config => {
            println!("pocket-ledger Configuration");
            println!("===========================");
            println!("Data directory:    {}", paths.base_dir().display());
            if paths.is_initialized() {
                println!("Settings file:     {}", paths.settings_file().display());
            } else {
                println!(
                    "Settings file:     {} (not written; run `pocket init`)",
                    paths.settings_file().display()
                );
            }
            println!("Reports directory: {}", paths.reports_dir().display());
            println!();
            println!("Settings:");
            println!("  Owner:          {}", settings.owner_name);
            println!("  Card number:    {}", settings.card_number);
            println!("  Currency:       {}", settings.currency_symbol);
            println!("  Interest rate:  {}", settings.interest_rate);
            println!("  Top N:          {}", settings.top_n);
            println!("  Week starts on: {}", settings.week_start());
        }
    }

    Ok(())
}
