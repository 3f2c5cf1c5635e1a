use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "aft")]
#[command(version, about = "AFT fund return simulator (USD and TRY)")]
#[command(
    long_about = "Simulate the return of the AFT equity basket between two moments entered in Turkey time (UTC+3), in US dollars and Turkish lira, with optional CSV export."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to a TOML config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Replay prices from a CSV file (symbol,timestamp,close) instead of Yahoo Finance
    #[arg(long = "prices-file", global = true, value_name = "CSV")]
    pub prices_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate the fund between two moments (defaults to the last 18:00 → 18:00 day)
    Run(RunArgs),

    /// Simulate from yesterday 18:00 (Turkey time) until now
    Intraday {
        /// Export the result to this CSV file
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },

    /// Show the fund's instruments and weights
    Fund,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Start date in Turkey time (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Start time in Turkey time (HH:MM, default 18:00)
    #[arg(long, requires = "start_date")]
    pub start_time: Option<String>,

    /// End date in Turkey time (YYYY-MM-DD)
    #[arg(long, conflicts_with = "end_now")]
    pub end_date: Option<String>,

    /// End time in Turkey time (HH:MM, default 18:00)
    #[arg(long, requires = "end_date")]
    pub end_time: Option<String>,

    /// Use the current moment as the end
    #[arg(long)]
    pub end_now: bool,

    /// Export the result to this CSV file
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}
