//! AFT - fund return simulator
//!
//! This library computes the return of a fixed equity basket between two
//! moments, in US dollars and Turkish lira, from historical market data.

pub mod config;
pub mod error;
pub mod fund;
pub mod pricing;
pub mod reports;
pub mod time_range;
pub mod utils;
