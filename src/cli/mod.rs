//! Command-line front end over the store and the list/chart pipeline.

pub mod commands;
pub mod context;
pub mod output;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::services::{SortDirection, SortField, TypeFilter};
use crate::core::utils::app_data_dir;
use crate::domain::{Granularity, TransactionKind};
use crate::errors::CliError;

pub use context::CliContext;

#[derive(Parser, Debug)]
#[command(
    name = "expense_core_cli",
    version,
    about = "Track income and expenses over 26th-to-25th financial months"
)]
pub struct Cli {
    /// Data directory (defaults to $EXPENSE_CORE_HOME, then ~/.expense_core)
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new transaction
    Add(AddArgs),
    /// Change fields of an existing transaction
    Edit(EditArgs),
    /// Delete a transaction
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// List the transactions of a period
    List(ViewArgs),
    /// Draw the period's buckets as a text chart
    Chart(ChartArgs),
    /// Show the boundaries of a period
    Period(PeriodArgs),
    /// Write every transaction to a JSON file
    Export {
        /// Destination directory (defaults to <home>/exports)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Replace every transaction with the contents of a JSON file
    Import { file: PathBuf },
    /// View or change preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print build information
    Version,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub amount: String,
    /// `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS]` or RFC 3339 (defaults to now)
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long = "type", default_value = "expense")]
    pub kind: TransactionKind,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long = "type")]
    pub kind: Option<TransactionKind>,
    #[arg(long)]
    pub description: Option<String>,
}

/// Filter, period and sort options shared by `list` and `chart`.
/// Unset options fall back to the saved preferences.
#[derive(Args, Debug, Default)]
pub struct ViewArgs {
    /// Case-insensitive match on title or description
    #[arg(long, short)]
    pub keyword: Option<String>,
    #[arg(long = "type")]
    pub type_filter: Option<TypeFilter>,
    #[arg(long)]
    pub view: Option<Granularity>,
    /// Any day inside the wanted period (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,
    #[arg(long)]
    pub sort: Option<SortField>,
    #[arg(long)]
    pub order: Option<SortDirection>,
    /// Step back this many periods
    #[arg(long, default_value_t = 0)]
    pub prev: u32,
    /// Step forward this many periods
    #[arg(long, default_value_t = 0)]
    pub next: u32,
}

#[derive(Args, Debug)]
pub struct ChartArgs {
    #[command(flatten)]
    pub view: ViewArgs,
    /// Cap drawn bars at this value (totals stay exact)
    #[arg(long)]
    pub cap: Option<f64>,
}

#[derive(Args, Debug)]
pub struct PeriodArgs {
    #[arg(long)]
    pub view: Option<Granularity>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,
    #[arg(long, default_value_t = 0)]
    pub prev: u32,
    #[arg(long, default_value_t = 0)]
    pub next: u32,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the current preferences
    Show,
    /// Change one preference
    Set { key: String, value: String },
}

/// Parses the process arguments and runs the selected command.
pub fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    run(cli)
}

/// Runs an already-parsed command line.
pub fn run(cli: Cli) -> Result<(), CliError> {
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    let base_dir = app_data_dir(cli.home.as_deref());
    let mut context = CliContext::open(&base_dir)?;
    tracing::debug!(command = ?cli.command, "dispatching command");
    commands::dispatch(&mut context, cli.command)
}
