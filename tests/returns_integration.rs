use aft::fund::Portfolio;
use aft::pricing::replay::ReplaySource;
use aft::pricing::Interval;
use aft::reports::{compute, write_csv, InstrumentOutcome};
use aft::time_range::{parse_civil, TimeRange};
use anyhow::Result;
use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const FX: &str = "USDTRY=X";

fn window(start: &str, end: &str) -> Result<TimeRange> {
    Ok(TimeRange::new(
        parse_civil(start, "18:00")?,
        parse_civil(end, "18:00")?,
    )?)
}

/// Prices for every AFT instrument except the last one, each moving by a
/// different amount between the two ends of `range`.
fn aft_source(range: &TimeRange) -> ReplaySource {
    let mut source = ReplaySource::new()
        .with_bar(FX, range.start + Duration::hours(9), dec!(36.00))
        .with_bar(FX, range.end + Duration::hours(9), dec!(36.72));

    let fund = Portfolio::aft();
    let priced = &fund.entries()[..fund.len() - 1];
    for (i, entry) in priced.iter().enumerate() {
        let open = Decimal::from(100 + i as i64);
        let close = open + Decimal::from(i as i64) - dec!(5);
        source = source
            .with_bar(&entry.symbol, range.start - Duration::minutes(1), open)
            .with_bar(&entry.symbol, range.end + Duration::minutes(2), close);
    }
    source
}

#[tokio::test]
async fn aft_basket_totals_are_consistent() -> Result<()> {
    let range = window("2025-03-03", "2025-03-04")?;
    let fund = Portfolio::aft();
    let result = compute(&range, &fund, &aft_source(&range), FX).await?;

    assert_eq!(result.interval, Interval::OneMinute);
    assert_eq!(result.instruments.len(), fund.len());
    assert_eq!(result.usd_tl_change, dec!(2));

    let mut expected_total = Decimal::ZERO;
    for (instrument, entry) in result.instruments.iter().zip(fund.entries()) {
        assert_eq!(instrument.symbol, entry.symbol);
        match &instrument.outcome {
            InstrumentOutcome::Ok(ret) => {
                assert_eq!(
                    ret.usd_pct_change,
                    (ret.close - ret.open) / ret.open * Decimal::ONE_HUNDRED
                );
                assert_eq!(ret.tl_pct_change, ret.usd_pct_change + result.usd_tl_change);
                assert_eq!(
                    ret.weighted_contribution,
                    ret.usd_pct_change * entry.weight / Decimal::ONE_HUNDRED
                );
                expected_total += ret.weighted_contribution;
            }
            InstrumentOutcome::Failed { .. } => {
                assert_eq!(instrument.symbol, "005930.KQ");
                assert_eq!(instrument.weighted_contribution(), Decimal::ZERO);
            }
        }
    }

    assert_eq!(result.failed_count(), 1);
    assert_eq!(result.total_usd_pct, expected_total);
    assert_eq!(result.total_tl_pct, result.total_usd_pct + result.usd_tl_change);
    Ok(())
}

#[tokio::test]
async fn long_windows_use_coarser_bars() -> Result<()> {
    let fund = Portfolio::aft();

    let ten_days = window("2025-03-01", "2025-03-11")?;
    let result = compute(&ten_days, &fund, &aft_source(&ten_days), FX).await?;
    assert_eq!(result.interval, Interval::FiveMinutes);

    let ninety_days = window("2025-01-01", "2025-04-01")?;
    let result = compute(&ninety_days, &fund, &aft_source(&ninety_days), FX).await?;
    assert_eq!(result.interval, Interval::OneHour);
    Ok(())
}

#[tokio::test]
async fn repeated_runs_export_identical_csv() -> Result<()> {
    let range = window("2025-03-03", "2025-03-04")?;
    let fund = Portfolio::aft();
    let source = aft_source(&range);

    let mut first = Vec::new();
    write_csv(&compute(&range, &fund, &source, FX).await?, &mut first)?;
    let mut second = Vec::new();
    write_csv(&compute(&range, &fund, &source, FX).await?, &mut second)?;

    assert_eq!(first, second);
    let text = String::from_utf8(first)?;
    assert_eq!(text.lines().count(), fund.len() + 2);
    assert!(text.contains("005930.KQ,-,-,-,FAILED"));
    Ok(())
}
