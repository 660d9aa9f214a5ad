use std::time::Duration;

use crate::models::TickerFundamentals;

pub mod alpha_vantage_client;
pub use alpha_vantage_client::AlphaVantageClient;

/// Errors surfaced by a market-data provider. A failed bulk retrieval fails
/// the whole ticker; the caller logs it and moves on to the next symbol.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("provider throttled the request: {0}")]
    Throttled(String),
    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

/// Simple rate limiter for API requests
pub struct ApiRateLimiter {
    delay_ms: u64,
}

impl ApiRateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let delay_ms = if requests_per_minute > 0 {
            60_000 / requests_per_minute as u64
        } else {
            1000 // Default 1 second delay
        };

        Self { delay_ms }
    }

    pub async fn wait(&self) {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
    }
}

/// The seam between the batch driver and the outside world. One call fetches
/// everything the metric extractor needs for a single ticker.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MarketDataProvider {
    /// Bulk retrieval of statements, dividend history and summary info.
    /// Statement or dividend failures fail the call; a failed close-price
    /// lookup degrades to `latest_close: None` instead.
    async fn fetch_fundamentals(&self, symbol: &str)
        -> Result<TickerFundamentals, ProviderError>;
}
