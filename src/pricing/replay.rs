//! Offline price source replaying bars from a CSV file.
//!
//! Expected header: `symbol,timestamp,close`. Timestamps are either
//! RFC 3339 (any offset, converted to UTC) or naive
//! `YYYY-MM-DD HH:MM[:SS]`, which is taken as UTC.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use super::{Interval, PriceBar, PriceSeries, PriceSource};

/// In-memory bars keyed by upper-cased symbol
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    bars: HashMap<String, Vec<PriceBar>>,
}

impl ReplaySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open price file {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("Invalid price file {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow!("Missing '{}' column", name))
        };
        let symbol_col = column("symbol")?;
        let timestamp_col = column("timestamp")?;
        let close_col = column("close")?;

        let mut source = Self::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let field = |col: usize| record.get(col).unwrap_or("");

            let timestamp = parse_timestamp(field(timestamp_col))
                .with_context(|| format!("Row {}: bad timestamp", line + 2))?;
            let close = Decimal::from_str(field(close_col))
                .with_context(|| format!("Row {}: bad close price", line + 2))?;

            source.push(field(symbol_col), PriceBar::new(timestamp, close));
        }

        Ok(source)
    }

    pub fn push(&mut self, symbol: &str, bar: PriceBar) {
        self.bars
            .entry(symbol.to_uppercase())
            .or_default()
            .push(bar);
    }

    pub fn with_bar(mut self, symbol: &str, timestamp: DateTime<Utc>, close: Decimal) -> Self {
        self.push(symbol, PriceBar::new(timestamp, close));
        self
    }
}

impl PriceSource for ReplaySource {
    async fn fetch_series(
        &self,
        symbol: &str,
        interval: Interval,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries> {
        let bars: Vec<PriceBar> = self
            .bars
            .get(&symbol.to_uppercase())
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.timestamp >= start && b.timestamp < end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            "Replaying {} {} bars for {} ({} to {})",
            bars.len(),
            interval,
            symbol,
            start,
            end
        );
        Ok(PriceSeries::new(symbol, bars))
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Ok(aware.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow!("Unrecognized timestamp '{}'", raw))
}
