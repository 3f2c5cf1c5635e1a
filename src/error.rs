//! Error handling for the fund simulator
//!
//! Typed errors for the failure classes the calculator distinguishes, plus
//! the crate-wide `Result` alias backed by anyhow for context chaining.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failure classes of a simulation run
#[derive(Error, Debug)]
pub enum FundError {
    #[error("no price data for {symbol}")]
    FetchEmpty { symbol: String },

    #[error("price fetch failed for {symbol}: {message}")]
    Fetch { symbol: String, message: String },

    #[error("USD/TRY rate unavailable")]
    FxUnavailable,

    #[error("malformed time input: {0}")]
    MalformedTimeInput(String),

    #[error("invalid time range: start {start} is not before end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("invalid portfolio: {0}")]
    InvalidPortfolio(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for application plumbing
pub type Result<T> = anyhow::Result<T>;
