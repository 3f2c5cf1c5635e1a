use chrono::{DateTime, Utc};

use crate::cli::RunArgs;
use crate::error::FundError;
use crate::time_range::{default_window, parse_civil, TimeRange};

/// Wall-clock time used when a date is given without a time
const DEFAULT_TIME: &str = "18:00";

/// Resolve `run` arguments into an absolute window.
///
/// Missing ends fall back to the default 18:00 → 18:00 window around
/// `now`; `--end-now` pins the end to `now`. Parsing errors are reported
/// before anything is fetched.
pub fn resolve_range(args: &RunArgs, now: DateTime<Utc>) -> Result<TimeRange, FundError> {
    let default = default_window(now)?;

    let start = match &args.start_date {
        Some(date) => parse_civil(date, args.start_time.as_deref().unwrap_or(DEFAULT_TIME))?,
        None => default.start,
    };

    let end = if args.end_now {
        now
    } else {
        match &args.end_date {
            Some(date) => parse_civil(date, args.end_time.as_deref().unwrap_or(DEFAULT_TIME))?,
            None => default.end,
        }
    };

    TimeRange::new(start, end)
}
