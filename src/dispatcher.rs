//! Command dispatcher that routes parsed CLI commands to their handlers.

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::cli::formatters::{format_fund_table, format_run_json, format_run_table};
use crate::cli::{runner, Cli, Commands};
use crate::config::Config;
use crate::fund::Portfolio;
use crate::pricing::replay::ReplaySource;
use crate::pricing::yahoo::YahooSource;
use crate::pricing::PriceSource;
use crate::reports::{self, RunProgress};
use crate::time_range::{intraday_window, TimeRange};

/// Route a parsed command line to its handler
pub async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.prices_file {
        config.prices_file = Some(path);
    }

    match cli.command {
        Commands::Fund => dispatch_fund(&config, cli.json),
        Commands::Run(args) => {
            let range = runner::resolve_range(&args, Utc::now())?;
            dispatch_simulation(&config, range, "Simulation", args.csv.as_deref(), cli.json).await
        }
        Commands::Intraday { csv } => {
            let range = intraday_window(Utc::now())?;
            dispatch_simulation(&config, range, "Intraday", csv.as_deref(), cli.json).await
        }
    }
}

fn dispatch_fund(config: &Config, json_output: bool) -> Result<()> {
    let portfolio = config.portfolio()?;
    if json_output {
        let payload = serde_json::json!({
            "instruments": portfolio.entries(),
            "total_weight": portfolio.total_weight(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", format_fund_table(&portfolio));
    }
    Ok(())
}

async fn dispatch_simulation(
    config: &Config,
    range: TimeRange,
    label: &str,
    csv_path: Option<&Path>,
    json_output: bool,
) -> Result<()> {
    let portfolio = config.portfolio()?;

    match &config.prices_file {
        Some(path) => {
            info!("Replaying prices from {}", path.display());
            let source = ReplaySource::from_path(path)?;
            simulate(&source, config, &portfolio, range, label, csv_path, json_output).await
        }
        None => {
            let source = YahooSource::new(&config.user_agent, config.request_timeout())?;
            simulate(&source, config, &portfolio, range, label, csv_path, json_output).await
        }
    }
}

async fn simulate<S: PriceSource>(
    source: &S,
    config: &Config,
    portfolio: &Portfolio,
    range: TimeRange,
    label: &str,
    csv_path: Option<&Path>,
    json_output: bool,
) -> Result<()> {
    let bar = if json_output {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(120));

    let result = reports::compute_with_progress(
        &range,
        portfolio,
        source,
        &config.fx_symbol,
        |event| match event {
            RunProgress::FetchingFx => bar.set_message(format!("Fetching {}", config.fx_symbol)),
            RunProgress::Instrument {
                index,
                total,
                symbol,
            } => bar.set_message(format!("Fetching {} ({}/{})", symbol, index + 1, total)),
            RunProgress::Done => bar.finish_and_clear(),
        },
    )
    .await?;

    if json_output {
        println!("{}", format_run_json(&result)?);
    } else {
        print!("{}", format_run_table(&result, label));
    }

    if let Some(path) = csv_path {
        reports::export_csv(&result, path)
            .with_context(|| format!("Failed to export CSV to {}", path.display()))?;
        if !json_output {
            println!("\n{} CSV saved: {}", "✓".green().bold(), path.display());
        }
    }

    Ok(())
}
