//! CSV export of a simulation run.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

use super::returns::RunResult;
use crate::utils::format_decimal;

const HEADER: [&str; 5] = [
    "Symbol",
    "USD % Change",
    "TL % Change",
    "Portfolio Contribution %",
    "Status",
];

/// Write one row per instrument plus a trailing totals row
pub fn write_csv<W: Write>(result: &RunResult, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;

    for instrument in &result.instruments {
        match (instrument.usd_pct_change(), instrument.tl_pct_change()) {
            (Some(usd), Some(tl)) => csv.write_record([
                instrument.symbol.clone(),
                format_decimal(usd),
                format_decimal(tl),
                format_decimal(instrument.weighted_contribution()),
                "OK".to_string(),
            ])?,
            _ => csv.write_record([instrument.symbol.as_str(), "-", "-", "-", "FAILED"])?,
        }
    }

    let totals = format!(
        "{} / {}",
        format_decimal(result.total_usd_pct),
        format_decimal(result.total_tl_pct)
    );
    csv.write_record(["TOTAL", "", "", totals.as_str(), ""])?;
    csv.flush()?;
    Ok(())
}

pub fn export_csv(result: &RunResult, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(result, file)?;
    info!("Exported {} instruments to {}", result.instruments.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::Interval;
    use crate::reports::returns::{instrument_change, InstrumentOutcome, InstrumentResult};
    use crate::time_range::TimeRange;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn sample() -> RunResult {
        let ok = instrument_change(dec!(100), dec!(110.005), dec!(50), dec!(5)).unwrap();
        RunResult {
            range: TimeRange::new(
                Utc.with_ymd_and_hms(2025, 3, 9, 15, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap(),
            )
            .unwrap(),
            interval: Interval::OneMinute,
            instruments: vec![
                InstrumentResult {
                    symbol: "A".to_string(),
                    weight: dec!(50),
                    outcome: InstrumentOutcome::Ok(ok),
                },
                InstrumentResult {
                    symbol: "B".to_string(),
                    weight: dec!(50),
                    outcome: InstrumentOutcome::Failed {
                        reason: "no price data for B".to_string(),
                    },
                },
            ],
            total_usd_pct: dec!(5.0025),
            total_tl_pct: dec!(10.0025),
            usd_tl_change: dec!(5),
            usd_try_start: Some(dec!(30)),
            usd_try_end: Some(dec!(31.5)),
        }
    }

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        write_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Symbol,USD % Change,TL % Change,Portfolio Contribution %,Status",
                "A,10.01,15.01,5.00,OK",
                "B,-,-,-,FAILED",
                "TOTAL,,,5.00 / 10.00,",
            ]
        );
    }

    #[test]
    fn test_export_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.csv");
        export_csv(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Symbol,"));
        assert!(text.contains("B,-,-,-,FAILED"));
    }
}
