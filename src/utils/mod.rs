//! Utility functions for formatting and common operations
//!
//! Centralized formatting so tables, CSV files and JSON-adjacent output
//! all render percentages and rates the same way.

use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder for values that could not be computed
pub const MISSING: &str = "-";

/// Round half away from zero to 2 decimal places and render with exactly
/// two fraction digits. Negative zero renders as `0.00`.
///
/// # Examples
/// ```
/// use aft::utils::format_decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_decimal(dec!(10.005)), "10.01");
/// assert_eq!(format_decimal(dec!(5)), "5.00");
/// assert_eq!(format_decimal(dec!(-0.001)), "0.00");
/// ```
pub fn format_decimal(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    format!("{:.2}", rounded)
}

/// Format a percentage: "12.34%"
///
/// # Examples
/// ```
/// use aft::utils::format_pct;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_pct(dec!(-3.456)), "-3.46%");
/// ```
pub fn format_pct(value: Decimal) -> String {
    format!("{}%", format_decimal(value))
}

/// Format an optional exchange rate, `-` when absent
///
/// # Examples
/// ```
/// use aft::utils::format_rate;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_rate(Some(dec!(36.4512))), "36.45");
/// assert_eq!(format_rate(None), "-");
/// ```
pub fn format_rate(value: Option<Decimal>) -> String {
    value.map(format_decimal).unwrap_or_else(|| MISSING.to_string())
}
