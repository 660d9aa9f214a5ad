//! Result sink tests

use pretty_assertions::assert_eq;
use test_log::test;

use dividend_scan::extractor::derive_metrics;
use dividend_scan::models::{TickerReport, REPORT_COLUMNS};
use dividend_scan::sink::append_reports;

use crate::common::test_data::fundamentals_with_everything;

fn sample_reports(symbols: &[&str]) -> Vec<TickerReport> {
    symbols
        .iter()
        .map(|s| derive_metrics(&fundamentals_with_everything(s)))
        .collect()
}

fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| l.to_string())
        .collect()
}

#[test]
fn creates_file_with_header_and_one_row_per_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");

    append_reports(&path, &sample_reports(&["AAPL", "MSFT"])).unwrap();

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 3); // header + 2 rows
    assert!(lines[0].starts_with("Ticker,Net Income,Operating Income"));
    assert_eq!(lines[0].split(',').count(), REPORT_COLUMNS.len());
    assert!(lines[1].starts_with("AAPL,"));
    assert!(lines[2].starts_with("MSFT,"));
}

#[test]
fn appending_adds_exactly_batch_size_rows_without_a_second_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");

    append_reports(&path, &sample_reports(&["AAPL", "MSFT"])).unwrap();
    let before = read_lines(&path);

    append_reports(&path, &sample_reports(&["KO", "JNJ", "PG"])).unwrap();
    let after = read_lines(&path);

    assert_eq!(after.len(), before.len() + 3);
    // Previously written rows are untouched.
    assert_eq!(&after[..before.len()], &before[..]);
    // No header row sneaks into the appended region.
    assert!(after[before.len()..]
        .iter()
        .all(|line| !line.starts_with("Ticker,")));
    assert!(after[before.len()].starts_with("KO,"));
}

#[test]
fn an_empty_existing_file_still_gets_a_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    std::fs::write(&path, "").unwrap();

    append_reports(&path, &sample_reports(&["AAPL"])).unwrap();

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Ticker,"));
}

#[test]
fn unwritable_path_reports_an_error_instead_of_panicking() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-subdir").join("results.csv");

    let result = append_reports(&path, &sample_reports(&["AAPL"]));
    assert!(result.is_err());
}
