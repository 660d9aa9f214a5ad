//! Sequential batch processing. Tickers are handled one at a time in input
//! order; a ticker whose bulk fetch fails is recorded and skipped without
//! touching the rest of the batch.

use tracing::{error, info};

use crate::api::MarketDataProvider;
use crate::extractor::derive_metrics;
use crate::models::TickerReport;

/// One ticker that failed its bulk retrieval.
#[derive(Debug, Clone)]
pub struct TickerFailure {
    pub symbol: String,
    pub reason: String,
}

/// Result of one batch run: reports in input order plus the skipped tickers.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub reports: Vec<TickerReport>,
    pub failures: Vec<TickerFailure>,
}

impl BatchOutcome {
    pub fn total_processed(&self) -> usize {
        self.reports.len() + self.failures.len()
    }
}

/// Fetch and derive metrics for every symbol, strictly sequentially.
pub async fn run_batch<P>(provider: &P, symbols: &[String]) -> BatchOutcome
where
    P: MarketDataProvider + ?Sized,
{
    let mut outcome = BatchOutcome::default();

    for symbol in symbols {
        info!("Processing {}...", symbol);

        match provider.fetch_fundamentals(symbol).await {
            Ok(fundamentals) => {
                outcome.reports.push(derive_metrics(&fundamentals));
            }
            Err(e) => {
                error!("❌ {}: fetch failed - {}", symbol, e);
                outcome.failures.push(TickerFailure {
                    symbol: symbol.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "Batch finished: {} succeeded, {} failed",
        outcome.reports.len(),
        outcome.failures.len()
    );
    outcome
}
