use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{Interval, PriceBar, PriceSeries, PriceSource};

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance chart response
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

/// Price source backed by the Yahoo Finance chart API
#[derive(Debug, Clone)]
pub struct YahooSource {
    client: Client,
}

impl YahooSource {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl PriceSource for YahooSource {
    async fn fetch_series(
        &self,
        symbol: &str,
        interval: Interval,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries> {
        info!(
            "Fetching {} bars for {} from {} to {}",
            interval, symbol, start, end
        );

        let url = format!(
            "{}/{}?period1={}&period2={}&interval={}",
            CHART_BASE_URL,
            symbol,
            start.timestamp(),
            end.timestamp(),
            interval.as_str()
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request to Yahoo Finance")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Yahoo Finance returned error status: {}",
                response.status()
            ));
        }

        let body = response
            .text()
            .await
            .context("Failed to read Yahoo Finance response")?;

        let bars = parse_chart(&body)?;
        debug!("Fetched {} bars for {}", bars.len(), symbol);

        Ok(PriceSeries::new(symbol, bars))
    }
}

/// Parse a chart payload into bars, skipping samples without a close.
///
/// A result without timestamps is an empty series (Yahoo answers that way
/// for windows with no trading), not an error.
fn parse_chart(body: &str) -> Result<Vec<PriceBar>> {
    let data: YahooChartResponse =
        serde_json::from_str(body).context("Failed to parse Yahoo Finance response")?;

    if let Some(error) = data.chart.error {
        return Err(anyhow!(
            "Yahoo Finance API error: {} - {}",
            error.code,
            error.description
        ));
    }

    let result = data
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| anyhow!("No data returned from Yahoo Finance"))?;

    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .ok_or_else(|| anyhow!("No close prices"))?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };
        let timestamp = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow!("Invalid timestamp {}", timestamp))?;
        let close =
            Decimal::from_f64_retain(close).ok_or_else(|| anyhow!("Invalid close price"))?;
        bars.push(PriceBar::new(timestamp, close));
    }

    Ok(bars)
}
