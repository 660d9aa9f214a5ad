//! End-to-end batch + sink flow with a stubbed provider

use pretty_assertions::assert_eq;
use std::collections::HashMap;
use test_log::test;

use dividend_scan::api::{MarketDataProvider, ProviderError};
use dividend_scan::batch::run_batch;
use dividend_scan::models::TickerFundamentals;
use dividend_scan::sink::append_reports;

use crate::common::test_data::fundamentals_with_everything;

/// Provider stub returning canned snapshots; unknown symbols fail like a
/// bulk-retrieval error would.
struct StubProvider {
    snapshots: HashMap<String, TickerFundamentals>,
}

impl StubProvider {
    fn with_symbols(symbols: &[&str]) -> Self {
        let snapshots = symbols
            .iter()
            .map(|s| (s.to_string(), fundamentals_with_everything(s)))
            .collect();
        Self { snapshots }
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for StubProvider {
    async fn fetch_fundamentals(
        &self,
        symbol: &str,
    ) -> Result<TickerFundamentals, ProviderError> {
        self.snapshots
            .get(symbol)
            .cloned()
            .ok_or_else(|| ProviderError::Decode(format!("unknown symbol {}", symbol)))
    }
}

fn to_strings(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

#[test(tokio::test)]
async fn batch_results_append_across_runs() {
    let provider = StubProvider::with_symbols(&["AAPL", "MSFT", "KO"]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dividend_predictions.csv");

    // First run: two tickers, fresh file.
    let first = run_batch(&provider, &to_strings(&["AAPL", "MSFT"])).await;
    assert_eq!(first.reports.len(), 2);
    append_reports(&path, &first.reports).unwrap();

    let after_first = std::fs::read_to_string(&path).unwrap();
    assert_eq!(after_first.lines().count(), 3); // header + 2

    // Second run: one ticker, appended to the same file.
    let second = run_batch(&provider, &to_strings(&["KO"])).await;
    append_reports(&path, &second.reports).unwrap();

    let after_second = std::fs::read_to_string(&path).unwrap();
    assert_eq!(after_second.lines().count(), 4);
    assert!(after_second.starts_with(&after_first));
}

#[test(tokio::test)]
async fn failed_tickers_contribute_no_rows() {
    let provider = StubProvider::with_symbols(&["AAPL", "KO"]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dividend_predictions.csv");

    let outcome = run_batch(&provider, &to_strings(&["AAPL", "GONE", "KO"])).await;
    assert_eq!(outcome.reports.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].symbol, "GONE");

    append_reports(&path, &outcome.reports).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 3); // header + AAPL + KO, no GONE row
    assert!(!contents.contains("GONE"));
}
