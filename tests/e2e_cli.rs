use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use cli_helpers::{
    base_cmd, cmd_with, decimal_from_value, run_cmd_json, write_file, HALF_FUND_PRICES,
    HALF_FUND_TOML, WINDOW_ARGS,
};

fn run_args(extra: &[&'static str]) -> Vec<&'static str> {
    let mut args = vec!["run"];
    args.extend_from_slice(&WINDOW_ARGS);
    args.extend_from_slice(extra);
    args
}

#[test]
fn fund_lists_builtin_basket_without_config() {
    let home = TempDir::new().expect("failed to create temp home");

    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin!("aft"));
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("AFT_CONFIG")
        .arg("--no-color")
        .arg("fund");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("NVDA"))
        .stdout(predicate::str::contains("005930.KQ"))
        .stdout(predicate::str::contains("97.12%"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn run_table_shows_partial_failure_and_totals() {
    let home = TempDir::new().expect("failed to create temp home");

    let mut cmd = base_cmd(&home);
    cmd.args(run_args(&[]));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2025-03-09 18:00 → 2025-03-10 18:00"))
        .stdout(predicate::str::contains("USD/TRY start: 30.00 | USD/TRY end: 31.50"))
        .stdout(predicate::str::contains("⚠ B: no price data for B"))
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains(
            "Total AFT fund change: 5.00% (USD), 10.00% (TL)",
        ))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn run_json_matches_expected_totals() -> Result<()> {
    let home = TempDir::new()?;

    let mut args = vec!["--json"];
    args.extend(run_args(&[]));
    let value = run_cmd_json(&home, &args)?;

    assert_eq!(decimal_from_value(&value["total_usd_pct"])?, dec!(5));
    assert_eq!(decimal_from_value(&value["total_tl_pct"])?, dec!(10));
    assert_eq!(decimal_from_value(&value["usd_tl_change"])?, dec!(5));
    assert_eq!(value["interval"], "1m");

    let instruments = value["instruments"].as_array().expect("instruments array");
    assert_eq!(instruments.len(), 2);
    assert_eq!(instruments[0]["symbol"], "A");
    assert_eq!(instruments[0]["status"], "ok");
    assert_eq!(decimal_from_value(&instruments[0]["open"])?, dec!(100));
    assert_eq!(decimal_from_value(&instruments[0]["close"])?, dec!(110));
    assert_eq!(instruments[1]["symbol"], "B");
    assert_eq!(instruments[1]["status"], "failed");
    assert_eq!(value["advisories"][0], "B: no price data for B");
    Ok(())
}

#[test]
fn run_exports_csv() -> Result<()> {
    let home = TempDir::new()?;
    let csv_path = home.path().join("out.csv");
    let csv_arg = csv_path.to_string_lossy().to_string();

    let mut cmd = base_cmd(&home);
    cmd.args(run_args(&[])).arg("--csv").arg(&csv_arg);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("CSV saved"));

    let text = std::fs::read_to_string(&csv_path)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Symbol,USD % Change,TL % Change,Portfolio Contribution %,Status",
            "A,10.00,15.00,5.00,OK",
            "B,-,-,-,FAILED",
            "TOTAL,,,5.00 / 10.00,",
        ]
    );
    Ok(())
}

#[test]
fn malformed_time_fails_before_any_output() {
    let home = TempDir::new().expect("failed to create temp home");

    let mut cmd = base_cmd(&home);
    cmd.args([
        "run",
        "--start-date",
        "2025-03-09",
        "--start-time",
        "18:75",
        "--end-date",
        "2025-03-10",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("malformed time input"))
        .stdout(predicate::str::contains("Total AFT fund change").not());
}

#[test]
fn reversed_window_is_rejected() {
    let home = TempDir::new().expect("failed to create temp home");

    let mut cmd = base_cmd(&home);
    cmd.args([
        "run",
        "--start-date",
        "2025-03-10",
        "--end-date",
        "2025-03-09",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid time range"));
}

#[test]
fn invalid_fund_config_is_rejected() {
    let home = TempDir::new().expect("failed to create temp home");
    let config = write_file(&home, "negative.toml", "[[fund]]\nsymbol = \"A\"\nweight = -5\n");
    let prices = write_file(&home, "prices.csv", HALF_FUND_PRICES);

    let mut cmd = cmd_with(&home, &config, &prices);
    cmd.args(run_args(&[]));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid portfolio"));
}

#[test]
fn missing_fx_data_falls_back_to_usd() -> Result<()> {
    let home = TempDir::new()?;
    let prices = write_file(
        &home,
        "no_fx.csv",
        "symbol,timestamp,close\nA,2025-03-09 15:00,100\nA,2025-03-10 15:00,90\n",
    );

    let config = write_file(&home, "config.toml", HALF_FUND_TOML);

    let mut cmd = cmd_with(&home, &config, &prices);
    cmd.arg("--json").args(run_args(&[]));
    let output = cmd.output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert!(value["usd_try_start"].is_null());
    assert!(value["usd_try_end"].is_null());
    assert_eq!(decimal_from_value(&value["total_usd_pct"])?, dec!(-5));
    assert_eq!(decimal_from_value(&value["total_tl_pct"])?, dec!(-5));
    Ok(())
}
