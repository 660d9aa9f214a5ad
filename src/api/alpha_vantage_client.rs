use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::{
    line_items, CompanyInfo, Config, DividendEvent, StatementTable, TickerFundamentals,
};
use super::{ApiRateLimiter, MarketDataProvider, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage INCOME_STATEMENT annual report (string-typed fields,
/// "None" meaning missing)
#[derive(Debug, Deserialize)]
struct IncomeReport {
    #[serde(rename = "fiscalDateEnding")]
    fiscal_date_ending: String,
    #[serde(rename = "netIncome")]
    net_income: Option<String>,
    #[serde(rename = "operatingIncome")]
    operating_income: Option<String>,
    #[serde(rename = "ebit")]
    ebit: Option<String>,
    #[serde(rename = "totalRevenue")]
    total_revenue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IncomeStatementResponse {
    #[serde(rename = "annualReports", default)]
    annual_reports: Vec<IncomeReport>,
}

/// Alpha Vantage BALANCE_SHEET annual report
#[derive(Debug, Deserialize)]
struct BalanceReport {
    #[serde(rename = "fiscalDateEnding")]
    fiscal_date_ending: String,
    #[serde(rename = "retainedEarnings")]
    retained_earnings: Option<String>,
    #[serde(rename = "cashAndCashEquivalentsAtCarryingValue")]
    cash_and_equivalents: Option<String>,
    #[serde(rename = "shortLongTermDebtTotal")]
    total_debt: Option<String>,
    #[serde(rename = "totalShareholderEquity")]
    total_shareholder_equity: Option<String>,
    #[serde(rename = "totalAssets")]
    total_assets: Option<String>,
    #[serde(rename = "totalLiabilities")]
    total_liabilities: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BalanceSheetResponse {
    #[serde(rename = "annualReports", default)]
    annual_reports: Vec<BalanceReport>,
}

/// Alpha Vantage CASH_FLOW annual report
#[derive(Debug, Deserialize)]
struct CashFlowReport {
    #[serde(rename = "fiscalDateEnding")]
    fiscal_date_ending: String,
    #[serde(rename = "operatingCashflow")]
    operating_cashflow: Option<String>,
    #[serde(rename = "capitalExpenditures")]
    capital_expenditures: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CashFlowResponse {
    #[serde(rename = "annualReports", default)]
    annual_reports: Vec<CashFlowReport>,
}

/// Alpha Vantage DIVIDENDS history entry (snake_case on this endpoint)
#[derive(Debug, Deserialize)]
struct DividendEntry {
    ex_dividend_date: String,
    amount: String,
}

#[derive(Debug, Deserialize)]
struct DividendsResponse {
    #[serde(default)]
    data: Vec<DividendEntry>,
}

/// Alpha Vantage OVERVIEW summary info (only the fields the extractor uses)
#[derive(Debug, Deserialize)]
struct OverviewResponse {
    #[serde(rename = "SharesOutstanding")]
    shares_outstanding: Option<String>,
    #[serde(rename = "DividendYield")]
    dividend_yield: Option<String>,
}

/// Alpha Vantage TIME_SERIES_DAILY response
#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)", default)]
    time_series: HashMap<String, DailyBar>,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "4. close")]
    close: String,
}

/// Alpha Vantage API client
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: ApiRateLimiter,
}

impl AlphaVantageClient {
    /// Create a client against the production endpoint.
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint (used by tests).
    pub fn with_base_url(config: &Config, base_url: &str) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("dividend-scan/1.0")
            .build()?;

        Ok(Self {
            client,
            api_key: config.alpha_vantage_api_key.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter: ApiRateLimiter::new(config.rate_limit_per_minute),
        })
    }

    /// One rate-limited GET for a given `function`. Returns the raw body
    /// after rejecting HTTP errors and throttle-note responses.
    async fn fetch_function(
        &self,
        function: &str,
        symbol: &str,
        extra: &[(&str, &str)],
    ) -> Result<String, ProviderError> {
        self.rate_limiter.wait().await;

        let mut url = format!(
            "{}?function={}&symbol={}&apikey={}",
            self.base_url, function, symbol, self.api_key
        );
        for (key, value) in extra {
            url.push_str(&format!("&{}={}", key, value));
        }

        debug!("Fetching {} for {}", function, symbol);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let text = response.text().await?;
        reject_error_body(&text)?;
        Ok(text)
    }

    /// Income statement mapped onto canonical line items.
    pub async fn get_income_statement(&self, symbol: &str) -> Result<StatementTable, ProviderError> {
        let text = self.fetch_function("INCOME_STATEMENT", symbol, &[]).await?;
        let parsed: IncomeStatementResponse = decode(&text)?;

        let mut table = StatementTable::new();
        for report in &parsed.annual_reports {
            let Some(date) = parse_fiscal_date(symbol, &report.fiscal_date_ending) else {
                continue;
            };
            insert_field(&mut table, line_items::NET_INCOME, date, &report.net_income);
            insert_field(&mut table, line_items::OPERATING_INCOME, date, &report.operating_income);
            insert_field(&mut table, line_items::EBIT, date, &report.ebit);
            insert_field(&mut table, line_items::TOTAL_REVENUE, date, &report.total_revenue);
        }
        Ok(table)
    }

    /// Balance sheet mapped onto canonical line items.
    pub async fn get_balance_sheet(&self, symbol: &str) -> Result<StatementTable, ProviderError> {
        let text = self.fetch_function("BALANCE_SHEET", symbol, &[]).await?;
        let parsed: BalanceSheetResponse = decode(&text)?;

        let mut table = StatementTable::new();
        for report in &parsed.annual_reports {
            let Some(date) = parse_fiscal_date(symbol, &report.fiscal_date_ending) else {
                continue;
            };
            insert_field(&mut table, line_items::RETAINED_EARNINGS, date, &report.retained_earnings);
            insert_field(&mut table, line_items::CASH, date, &report.cash_and_equivalents);
            insert_field(&mut table, line_items::TOTAL_DEBT, date, &report.total_debt);
            insert_field(&mut table, line_items::STOCKHOLDERS_EQUITY, date, &report.total_shareholder_equity);
            insert_field(&mut table, line_items::TOTAL_ASSETS, date, &report.total_assets);
            insert_field(&mut table, line_items::TOTAL_LIABILITIES, date, &report.total_liabilities);
        }
        Ok(table)
    }

    /// Cash-flow statement. Alpha Vantage reports no direct free-cash-flow
    /// line, so the canonical row is operating cash flow minus capital
    /// expenditure when both are present.
    pub async fn get_cash_flow(&self, symbol: &str) -> Result<StatementTable, ProviderError> {
        let text = self.fetch_function("CASH_FLOW", symbol, &[]).await?;
        let parsed: CashFlowResponse = decode(&text)?;

        let mut table = StatementTable::new();
        for report in &parsed.annual_reports {
            let Some(date) = parse_fiscal_date(symbol, &report.fiscal_date_ending) else {
                continue;
            };
            if let (Some(operating), Some(capex)) = (
                parse_field(&report.operating_cashflow),
                parse_field(&report.capital_expenditures),
            ) {
                table.insert(line_items::FREE_CASH_FLOW, date, operating - capex);
            }
        }
        Ok(table)
    }

    /// Dividend history, ascending by ex-dividend date. Entries with an
    /// unparsable date or amount are dropped.
    pub async fn get_dividends(&self, symbol: &str) -> Result<Vec<DividendEvent>, ProviderError> {
        let text = self.fetch_function("DIVIDENDS", symbol, &[]).await?;
        let parsed: DividendsResponse = decode(&text)?;

        let mut events: Vec<DividendEvent> = parsed
            .data
            .iter()
            .filter_map(|entry| {
                let ex_date =
                    NaiveDate::parse_from_str(&entry.ex_dividend_date, "%Y-%m-%d").ok()?;
                let amount = entry.amount.trim().parse::<f64>().ok()?;
                Some(DividendEvent { ex_date, amount })
            })
            .collect();
        events.sort_by_key(|e| e.ex_date);
        Ok(events)
    }

    /// Summary info. Unparsable fields degrade to `None` rather than failing.
    pub async fn get_overview(&self, symbol: &str) -> Result<CompanyInfo, ProviderError> {
        let text = self.fetch_function("OVERVIEW", symbol, &[]).await?;
        let parsed: OverviewResponse = decode(&text)?;

        Ok(CompanyInfo {
            shares_outstanding: parse_field(&parsed.shares_outstanding),
            dividend_yield: parse_field(&parsed.dividend_yield),
        })
    }

    /// Close price of the most recent trading day.
    pub async fn get_latest_close(&self, symbol: &str) -> Result<f64, ProviderError> {
        let text = self
            .fetch_function("TIME_SERIES_DAILY", symbol, &[("outputsize", "compact")])
            .await?;
        let parsed: DailyResponse = decode(&text)?;

        let latest = parsed
            .time_series
            .iter()
            .filter_map(|(date_str, bar)| {
                let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
                Some((date, bar))
            })
            .max_by_key(|(date, _)| *date)
            .ok_or_else(|| {
                ProviderError::Decode(format!("no daily price data for {}", symbol))
            })?;

        latest.1.close.parse::<f64>().map_err(|e| {
            ProviderError::Decode(format!(
                "bad close price '{}' for {}: {}",
                latest.1.close, symbol, e
            ))
        })
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for AlphaVantageClient {
    async fn fetch_fundamentals(
        &self,
        symbol: &str,
    ) -> Result<TickerFundamentals, ProviderError> {
        let income_statement = self.get_income_statement(symbol).await?;
        let balance_sheet = self.get_balance_sheet(symbol).await?;
        let cash_flow = self.get_cash_flow(symbol).await?;
        let dividends = self.get_dividends(symbol).await?;
        let info = self.get_overview(symbol).await?;

        // A missing close never fails the whole ticker.
        let latest_close = match self.get_latest_close(symbol).await {
            Ok(close) => Some(close),
            Err(e) => {
                warn!("No latest close for {}: {}", symbol, e);
                None
            }
        };

        Ok(TickerFundamentals {
            symbol: symbol.to_string(),
            income_statement,
            balance_sheet,
            cash_flow,
            dividends,
            info,
            latest_close,
        })
    }
}

/// Alpha Vantage signals throttling and bad symbols with a 200-status JSON
/// body instead of an HTTP error.
fn reject_error_body(text: &str) -> Result<(), ProviderError> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return Ok(()); // non-JSON bodies fail later, in typed decoding
    };

    for key in ["Note", "Information"] {
        if let Some(note) = value.get(key).and_then(|v| v.as_str()) {
            return Err(ProviderError::Throttled(note.to_string()));
        }
    }
    if let Some(message) = value.get("Error Message").and_then(|v| v.as_str()) {
        return Err(ProviderError::Decode(message.to_string()));
    }
    Ok(())
}

fn decode<'a, T: Deserialize<'a>>(text: &'a str) -> Result<T, ProviderError> {
    serde_json::from_str(text).map_err(|e| {
        ProviderError::Decode(format!(
            "{} | response: {}",
            e,
            text.chars().take(200).collect::<String>()
        ))
    })
}

/// Parse an optional string field to f64. Alpha Vantage reports missing
/// values as "None", "-", or an empty string.
fn parse_field(value: &Option<String>) -> Option<f64> {
    value.as_ref().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "None" || trimmed == "-" {
            None
        } else {
            trimmed.parse::<f64>().ok()
        }
    })
}

fn insert_field(
    table: &mut StatementTable,
    line_item: &str,
    date: NaiveDate,
    raw: &Option<String>,
) {
    if let Some(value) = parse_field(raw) {
        table.insert(line_item, date, value);
    }
}

fn parse_fiscal_date(symbol: &str, raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            warn!("Skipping report with bad fiscal date '{}' for {}: {}", raw, symbol, e);
            None
        }
    }
}
