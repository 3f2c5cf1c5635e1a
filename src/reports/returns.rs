//! Fund return calculation.
//!
//! A run samples every instrument at the bar nearest to the window's start
//! and end, converts the move to a percentage, weights it, and adds the
//! USD/TRY move on top for the lira view. Missing data for one instrument
//! (or for the exchange rate) is recorded in the result and never stops
//! the run.

use anyhow::{anyhow, Result};
use chrono::Duration;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::fx::{fetch_fx_bracket, FxBracket};
use crate::error::FundError;
use crate::fund::{Portfolio, PortfolioEntry};
use crate::pricing::{Interval, PriceSource};
use crate::time_range::TimeRange;

/// Padding added on both sides of the instrument request window
const FETCH_PADDING_MINUTES: i64 = 5;

/// Longest span served with one-minute bars
const MINUTE_BARS_MAX_DAYS: i64 = 7;

/// Longest span served with five-minute bars
const FIVE_MINUTE_BARS_MAX_DAYS: i64 = 59;

/// Computed return of a single instrument
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentReturn {
    pub open: Decimal,
    pub close: Decimal,
    pub usd_pct_change: Decimal,
    pub tl_pct_change: Decimal,
    pub weighted_contribution: Decimal,
}

/// Per-instrument outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstrumentOutcome {
    Ok(InstrumentReturn),
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentResult {
    pub symbol: String,
    pub weight: Decimal,
    #[serde(flatten)]
    pub outcome: InstrumentOutcome,
}

impl InstrumentResult {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, InstrumentOutcome::Ok(_))
    }

    pub fn usd_pct_change(&self) -> Option<Decimal> {
        match &self.outcome {
            InstrumentOutcome::Ok(r) => Some(r.usd_pct_change),
            InstrumentOutcome::Failed { .. } => None,
        }
    }

    pub fn tl_pct_change(&self) -> Option<Decimal> {
        match &self.outcome {
            InstrumentOutcome::Ok(r) => Some(r.tl_pct_change),
            InstrumentOutcome::Failed { .. } => None,
        }
    }

    /// Contribution to the fund total; failed instruments contribute 0
    pub fn weighted_contribution(&self) -> Decimal {
        match &self.outcome {
            InstrumentOutcome::Ok(r) => r.weighted_contribution,
            InstrumentOutcome::Failed { .. } => Decimal::ZERO,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            InstrumentOutcome::Ok(_) => None,
            InstrumentOutcome::Failed { reason } => Some(reason),
        }
    }
}

/// Result of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub range: TimeRange,
    pub interval: Interval,
    pub instruments: Vec<InstrumentResult>,
    pub total_usd_pct: Decimal,
    pub total_tl_pct: Decimal,
    pub usd_tl_change: Decimal,
    pub usd_try_start: Option<Decimal>,
    pub usd_try_end: Option<Decimal>,
}

impl RunResult {
    /// Human-readable notes for every instrument that could not be priced
    pub fn advisories(&self) -> Vec<String> {
        self.instruments
            .iter()
            .filter_map(|r| {
                r.failure_reason()
                    .map(|reason| format!("{}: {}", r.symbol, reason))
            })
            .collect()
    }

    pub fn failed_count(&self) -> usize {
        self.instruments.iter().filter(|r| !r.is_ok()).count()
    }
}

/// Bar granularity for a window.
///
/// Finer bars are only kept by the feed for short lookbacks, so longer
/// windows fall back to coarser bars.
pub fn select_interval(range: &TimeRange) -> Interval {
    let span = range.span();
    if span <= Duration::days(MINUTE_BARS_MAX_DAYS) {
        Interval::OneMinute
    } else if span <= Duration::days(FIVE_MINUTE_BARS_MAX_DAYS) {
        Interval::FiveMinutes
    } else {
        Interval::OneHour
    }
}

/// Progress notifications emitted while a run is in flight
#[derive(Debug, Clone, PartialEq)]
pub enum RunProgress {
    FetchingFx,
    Instrument {
        index: usize,
        total: usize,
        symbol: String,
    },
    Done,
}

/// Run the fund simulation over `range`.
///
/// Fetches are issued one at a time in portfolio order. Only an invalid
/// portfolio makes the run fail; data problems are recorded per instrument.
pub async fn compute<S: PriceSource>(
    range: &TimeRange,
    portfolio: &Portfolio,
    source: &S,
    fx_symbol: &str,
) -> Result<RunResult> {
    compute_with_progress(range, portfolio, source, fx_symbol, |_| {}).await
}

/// Version of [`compute`] with a progress callback for UI updates
pub async fn compute_with_progress<S, F>(
    range: &TimeRange,
    portfolio: &Portfolio,
    source: &S,
    fx_symbol: &str,
    mut progress: F,
) -> Result<RunResult>
where
    S: PriceSource,
    F: FnMut(&RunProgress),
{
    if portfolio.is_empty() {
        return Err(FundError::InvalidPortfolio("portfolio has no instruments".to_string()).into());
    }

    progress(&RunProgress::FetchingFx);
    let fx = fetch_fx_bracket(source, fx_symbol, range).await;
    let usd_tl_change = fx.change_pct();

    let interval = select_interval(range);
    info!(
        "Simulating {} instruments from {} to {} with {} bars",
        portfolio.len(),
        range.start,
        range.end,
        interval
    );

    let mut instruments = Vec::with_capacity(portfolio.len());
    for (index, entry) in portfolio.entries().iter().enumerate() {
        progress(&RunProgress::Instrument {
            index,
            total: portfolio.len(),
            symbol: entry.symbol.clone(),
        });

        let outcome = match instrument_return(source, entry, range, interval, usd_tl_change).await {
            Ok(ret) => InstrumentOutcome::Ok(ret),
            Err(e) => {
                warn!("{} failed: {:#}", entry.symbol, e);
                InstrumentOutcome::Failed {
                    reason: format!("{:#}", e),
                }
            }
        };
        instruments.push(InstrumentResult {
            symbol: entry.symbol.clone(),
            weight: entry.weight,
            outcome,
        });
    }

    progress(&RunProgress::Done);
    Ok(summarize(range, interval, instruments, &fx))
}

async fn instrument_return<S: PriceSource>(
    source: &S,
    entry: &PortfolioEntry,
    range: &TimeRange,
    interval: Interval,
    usd_tl_change: Decimal,
) -> Result<InstrumentReturn> {
    let padding = Duration::minutes(FETCH_PADDING_MINUTES);
    let series = source
        .fetch_series(
            &entry.symbol,
            interval,
            range.start - padding,
            range.end + padding,
        )
        .await
        .map_err(|e| FundError::Fetch {
            symbol: entry.symbol.clone(),
            message: format!("{:#}", e),
        })?;

    let empty = || FundError::FetchEmpty {
        symbol: entry.symbol.clone(),
    };
    let open = series.nearest(range.start).ok_or_else(empty)?.close;
    let close = series.nearest(range.end).ok_or_else(empty)?.close;

    instrument_change(open, close, entry.weight, usd_tl_change)
}

/// Percentage move from `open` to `close`, its lira view and its weighted
/// contribution to the fund.
pub fn instrument_change(
    open: Decimal,
    close: Decimal,
    weight: Decimal,
    usd_tl_change: Decimal,
) -> Result<InstrumentReturn> {
    let usd_pct_change = (close - open)
        .checked_div(open)
        .ok_or_else(|| anyhow!("cannot compute change from open price {}", open))?
        * Decimal::ONE_HUNDRED;

    Ok(InstrumentReturn {
        open,
        close,
        usd_pct_change,
        tl_pct_change: usd_pct_change + usd_tl_change,
        weighted_contribution: usd_pct_change * weight / Decimal::ONE_HUNDRED,
    })
}

fn summarize(
    range: &TimeRange,
    interval: Interval,
    instruments: Vec<InstrumentResult>,
    fx: &FxBracket,
) -> RunResult {
    let usd_tl_change = fx.change_pct();
    let total_usd_pct: Decimal = instruments.iter().map(|r| r.weighted_contribution()).sum();

    RunResult {
        range: *range,
        interval,
        instruments,
        total_usd_pct,
        total_tl_pct: total_usd_pct + usd_tl_change,
        usd_tl_change,
        usd_try_start: fx.start_rate,
        usd_try_end: fx.end_rate,
    }
}
