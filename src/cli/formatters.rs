//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of calculation from presentation.

use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::fund::Portfolio;
use crate::reports::RunResult;
use crate::time_range::to_civil;
use crate::utils::{format_decimal, format_pct, format_rate, MISSING};

/// Format a run for JSON output, including advisories for failed instruments
pub fn format_run_json(result: &RunResult) -> Result<String> {
    #[derive(Serialize)]
    struct JsonRun<'a> {
        #[serde(flatten)]
        result: &'a RunResult,
        advisories: Vec<String>,
    }

    let payload = JsonRun {
        result,
        advisories: result.advisories(),
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

fn colored_pct(value: Decimal) -> String {
    let text = format_pct(value);
    if value >= Decimal::ZERO {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Format a run for terminal table output.
///
/// `label` names the window in the heading (e.g. "Intraday").
pub fn format_run_table(result: &RunResult, label: &str) -> String {
    let mut output = String::new();

    let civil_fmt = "%Y-%m-%d %H:%M";
    output.push_str(&format!(
        "\n{} AFT Fund {} – {} → {} (UTC+3)\n",
        "📊".cyan().bold(),
        label,
        to_civil(result.range.start).format(civil_fmt),
        to_civil(result.range.end).format(civil_fmt),
    ));
    output.push_str(&format!(
        "   UTC: {} → {} · {} bars\n",
        result.range.start.format(civil_fmt),
        result.range.end.format(civil_fmt),
        result.interval
    ));

    output.push_str(&format!(
        "\n{} USD/TRY start: {} | USD/TRY end: {}",
        "💱".cyan().bold(),
        format_rate(result.usd_try_start),
        format_rate(result.usd_try_end)
    ));
    if result.usd_try_start.is_some() && result.usd_try_end.is_some() {
        output.push_str(&format!(" ({})\n", colored_pct(result.usd_tl_change)));
    } else {
        output.push_str(&format!(" {}\n", "(rate unavailable, TL = USD)".yellow()));
    }

    let advisories = result.advisories();
    if !advisories.is_empty() {
        output.push('\n');
        for advisory in &advisories {
            output.push_str(&format!("{} {}\n", "⚠".yellow().bold(), advisory));
        }
    }

    #[derive(Tabled)]
    struct InstrumentRow {
        #[tabled(rename = "Symbol")]
        symbol: String,
        #[tabled(rename = "Weight")]
        weight: String,
        #[tabled(rename = "USD %")]
        usd: String,
        #[tabled(rename = "TL %")]
        tl: String,
        #[tabled(rename = "Contribution %")]
        contribution: String,
        #[tabled(rename = "Status")]
        status: String,
    }

    let rows: Vec<InstrumentRow> = result
        .instruments
        .iter()
        .map(|r| match (r.usd_pct_change(), r.tl_pct_change()) {
            (Some(usd), Some(tl)) => InstrumentRow {
                symbol: r.symbol.clone(),
                weight: format_decimal(r.weight),
                usd: colored_pct(usd),
                tl: colored_pct(tl),
                contribution: colored_pct(r.weighted_contribution()),
                status: "OK".green().to_string(),
            },
            _ => InstrumentRow {
                symbol: r.symbol.clone(),
                weight: format_decimal(r.weight),
                usd: "ERROR".red().to_string(),
                tl: MISSING.to_string(),
                contribution: MISSING.to_string(),
                status: "FAILED".red().to_string(),
            },
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    // Right-align numeric columns
    table.modify(Columns::new(1..5), Alignment::right());

    output.push('\n');
    output.push_str(&table.to_string());

    output.push_str(&format!(
        "\n\n{} Total AFT fund change: {} (USD), {} (TL)\n",
        "📈".cyan().bold(),
        colored_pct(result.total_usd_pct),
        colored_pct(result.total_tl_pct)
    ));
    if result.failed_count() > 0 {
        output.push_str(&format!(
            "   {} of {} instruments priced; failed ones count as 0%\n",
            result.instruments.len() - result.failed_count(),
            result.instruments.len()
        ));
    }

    output
}

/// Format the fund composition
pub fn format_fund_table(portfolio: &Portfolio) -> String {
    #[derive(Tabled)]
    struct FundRow {
        #[tabled(rename = "#")]
        index: usize,
        #[tabled(rename = "Symbol")]
        symbol: String,
        #[tabled(rename = "Weight %")]
        weight: String,
    }

    let rows: Vec<FundRow> = portfolio
        .entries()
        .iter()
        .enumerate()
        .map(|(i, e)| FundRow {
            index: i + 1,
            symbol: e.symbol.clone(),
            weight: format_decimal(e.weight),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(2..), Alignment::right());

    format!(
        "\n{} AFT Fund ({} instruments)\n\n{}\n{:<14} {}%\n",
        "📋".cyan().bold(),
        portfolio.len(),
        table,
        "Total weight:".bold(),
        format_decimal(portfolio.total_weight())
    )
}
