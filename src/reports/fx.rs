//! USD/TRY bracket: the exchange rate at both ends of a simulation window.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::FundError;
use crate::pricing::{Interval, PriceSource};
use crate::time_range::TimeRange;

/// Exchange rates sampled at the start and end of a window.
///
/// Either both rates are present or neither is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FxBracket {
    pub start_rate: Option<Decimal>,
    pub end_rate: Option<Decimal>,
}

impl FxBracket {
    pub fn new(start_rate: Decimal, end_rate: Decimal) -> Self {
        Self {
            start_rate: Some(start_rate),
            end_rate: Some(end_rate),
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        self.start_rate.is_some() && self.end_rate.is_some()
    }

    /// Percentage move of USD against TRY over the window, 0 when unknown
    pub fn change_pct(&self) -> Decimal {
        match (self.start_rate, self.end_rate) {
            (Some(start), Some(end)) => (end - start)
                .checked_div(start)
                .map(|r| r * Decimal::ONE_HUNDRED)
                .unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        }
    }
}

/// Sample the FX symbol at both ends of `range`.
///
/// Each end is a separate one-day request starting at that instant; the
/// first daily bar of the request is the rate. Missing or unusable data on
/// either end makes the whole bracket unavailable.
pub async fn fetch_fx_bracket<S: PriceSource>(
    source: &S,
    fx_symbol: &str,
    range: &TimeRange,
) -> FxBracket {
    let start = rate_on_day(source, fx_symbol, range.start).await;
    let end = rate_on_day(source, fx_symbol, range.end).await;

    match (start, end) {
        (Ok(start), Ok(end)) => {
            debug!("{} bracket: {} -> {}", fx_symbol, start, end);
            FxBracket::new(start, end)
        }
        (start, end) => {
            for err in [start.err(), end.err()].into_iter().flatten() {
                warn!("{} rate unavailable: {:#}", fx_symbol, err);
            }
            FxBracket::unavailable()
        }
    }
}

async fn rate_on_day<S: PriceSource>(
    source: &S,
    fx_symbol: &str,
    at: DateTime<Utc>,
) -> Result<Decimal> {
    let series = source
        .fetch_series(fx_symbol, Interval::OneDay, at, at + Duration::days(1))
        .await?;

    let rate = series
        .first()
        .map(|bar| bar.close)
        .ok_or(FundError::FxUnavailable)?;
    if rate <= Decimal::ZERO {
        return Err(FundError::FxUnavailable.into());
    }
    Ok(rate)
}
