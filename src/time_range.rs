//! Simulation window and Turkey civil time conversion.
//!
//! User input is a civil date and wall-clock time in a fixed UTC+3 offset
//! (no daylight saving). Everything downstream works on UTC instants.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;

use crate::error::FundError;

/// Offset of the civil clock the user enters times in
pub const CIVIL_OFFSET_HOURS: i64 = 3;

/// Wall-clock hour the default and intraday windows are anchored to
const ANCHOR_HOUR: u32 = 18;

/// Absolute start/end instants of a simulation, `start < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, FundError> {
        if start >= end {
            return Err(FundError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

/// Convert a civil (UTC+3) wall-clock time into a UTC instant
pub fn civil_to_utc(date: NaiveDate, hour: u32, minute: u32) -> Result<DateTime<Utc>, FundError> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        FundError::MalformedTimeInput(format!("{:02}:{:02} is not a valid time", hour, minute))
    })?;
    Ok((date.and_time(time) - Duration::hours(CIVIL_OFFSET_HOURS)).and_utc())
}

/// Civil (UTC+3) wall-clock reading of a UTC instant
pub fn to_civil(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.naive_utc() + Duration::hours(CIVIL_OFFSET_HOURS)
}

/// Parse a `YYYY-MM-DD` date and an `HH:MM` time entered in civil time
pub fn parse_civil(date: &str, time: &str) -> Result<DateTime<Utc>, FundError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        FundError::MalformedTimeInput(format!("invalid date '{}', use YYYY-MM-DD", date))
    })?;

    let (hour, minute) = time
        .trim()
        .split_once(':')
        .ok_or_else(|| FundError::MalformedTimeInput(format!("invalid time '{}', use HH:MM", time)))?;
    let hour: u32 = hour
        .parse()
        .map_err(|_| FundError::MalformedTimeInput(format!("invalid hour '{}'", hour)))?;
    let minute: u32 = minute
        .parse()
        .map_err(|_| FundError::MalformedTimeInput(format!("invalid minute '{}'", minute)))?;

    civil_to_utc(date, hour, minute)
}

/// Most recent 18:00 civil time at or before `now`
pub fn last_anchor(now: DateTime<Utc>) -> Result<DateTime<Utc>, FundError> {
    let civil_now = to_civil(now);
    let today = civil_now.date();
    let anchor_date = if civil_now.time() >= anchor_time()? {
        today
    } else {
        today - Duration::days(1)
    };
    civil_to_utc(anchor_date, ANCHOR_HOUR, 0)
}

/// Window used when no dates are given: the 24 hours ending at the most
/// recent 18:00 civil time.
pub fn default_window(now: DateTime<Utc>) -> Result<TimeRange, FundError> {
    let end = last_anchor(now)?;
    TimeRange::new(end - Duration::days(1), end)
}

/// Intraday window: from yesterday's 18:00 civil time until `now`.
///
/// "Yesterday" is relative to the civil calendar date of `now`, so after
/// 18:00 the window spans more than 24 hours.
pub fn intraday_window(now: DateTime<Utc>) -> Result<TimeRange, FundError> {
    let yesterday = to_civil(now).date() - Duration::days(1);
    TimeRange::new(civil_to_utc(yesterday, ANCHOR_HOUR, 0)?, now)
}

fn anchor_time() -> Result<NaiveTime, FundError> {
    NaiveTime::from_hms_opt(ANCHOR_HOUR, 0, 0)
        .ok_or_else(|| FundError::MalformedTimeInput("invalid anchor hour".to_string()))
}
