//! Fund definition: the basket of instruments and their weights.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::FundError;

/// One instrument of the fund and its weight in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub symbol: String,
    pub weight: Decimal,
}

impl PortfolioEntry {
    pub fn new(symbol: impl Into<String>, weight: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            weight,
        }
    }
}

/// Ordered, validated set of fund entries.
///
/// Order is significant: results are reported in the same order the
/// entries were declared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    entries: Vec<PortfolioEntry>,
}

impl Portfolio {
    /// Build a portfolio, rejecting empty baskets, blank or duplicate
    /// symbols and negative weights.
    pub fn new(entries: Vec<PortfolioEntry>) -> Result<Self, FundError> {
        if entries.is_empty() {
            return Err(FundError::InvalidPortfolio(
                "portfolio has no instruments".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            let symbol = entry.symbol.trim();
            if symbol.is_empty() {
                return Err(FundError::InvalidPortfolio(
                    "instrument symbol is blank".to_string(),
                ));
            }
            if !seen.insert(symbol.to_uppercase()) {
                return Err(FundError::InvalidPortfolio(format!(
                    "duplicate symbol {}",
                    symbol
                )));
            }
            if entry.weight < Decimal::ZERO {
                return Err(FundError::InvalidPortfolio(format!(
                    "negative weight {} for {}",
                    entry.weight, symbol
                )));
            }
        }

        Ok(Self {
            entries: entries
                .into_iter()
                .map(|e| PortfolioEntry::new(e.symbol.trim(), e.weight))
                .collect(),
        })
    }

    /// The built-in AFT basket
    pub fn aft() -> Self {
        Self {
            entries: AFT_WEIGHTS
                .iter()
                .map(|(symbol, weight)| PortfolioEntry::new(*symbol, *weight))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[PortfolioEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights (close to, but not necessarily, 100)
    pub fn total_weight(&self) -> Decimal {
        self.entries.iter().map(|e| e.weight).sum()
    }
}

const AFT_WEIGHTS: [(&str, Decimal); 20] = [
    ("AAPL", dec!(4.86)),
    ("ADBE", dec!(4.83)),
    ("AMD", dec!(4.75)),
    ("AMZN", dec!(4.77)),
    ("AVGO", dec!(4.77)),
    ("BABA", dec!(4.93)),
    ("CRM", dec!(4.87)),
    ("DELL", dec!(4.64)),
    ("GOOGL", dec!(5.32)),
    ("INTC", dec!(4.64)),
    ("INTU", dec!(4.86)),
    ("META", dec!(4.75)),
    ("MSFT", dec!(4.84)),
    ("MU", dec!(4.73)),
    ("NFLX", dec!(4.93)),
    ("NVDA", dec!(5.25)),
    ("QCOM", dec!(4.83)),
    ("TSLA", dec!(4.79)),
    ("TSM", dec!(4.85)),
    // Samsung, listed on KRX
    ("005930.KQ", dec!(4.91)),
];
