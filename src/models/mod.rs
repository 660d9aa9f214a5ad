use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

/// Canonical line-item names shared by the provider client and the metric
/// extractor. Providers map their own field names onto these.
pub mod line_items {
    pub const NET_INCOME: &str = "Net Income";
    pub const OPERATING_INCOME: &str = "Operating Income";
    pub const EBIT: &str = "EBIT";
    pub const TOTAL_REVENUE: &str = "Total Revenue";
    pub const RETAINED_EARNINGS: &str = "Retained Earnings";
    pub const CASH: &str = "Cash";
    pub const TOTAL_DEBT: &str = "Total Debt";
    pub const STOCKHOLDERS_EQUITY: &str = "Stockholders Equity";
    pub const TOTAL_ASSETS: &str = "Total Assets";
    pub const TOTAL_LIABILITIES: &str = "Total Liabilities Net Minority Interest";
    pub const FREE_CASH_FLOW: &str = "Free Cash Flow";
}

/// A single derived metric cell. `Unavailable` is the explicit "not computable
/// from available data" sentinel and renders as `N/A`, distinct from zero.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Series(Vec<f64>),
    Unavailable,
}

impl MetricValue {
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) => MetricValue::Number(v),
            None => MetricValue::Unavailable,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, MetricValue::Unavailable)
    }

    /// Render for table and spreadsheet cells. Large magnitudes (statement
    /// line items) print without decimals, ratios with four.
    pub fn render(&self) -> String {
        match self {
            MetricValue::Number(v) if v.abs() >= 1000.0 => format!("{:.0}", v),
            MetricValue::Number(v) => format!("{:.4}", v),
            MetricValue::Text(s) => s.clone(),
            MetricValue::Series(values) => values
                .iter()
                .map(|v| format!("{:.4}", v))
                .collect::<Vec<_>>()
                .join("; "),
            MetricValue::Unavailable => "N/A".to_string(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so table formatting widths apply to the rendered value
        f.pad(&self.render())
    }
}

/// A financial report modeled as a table indexed by line-item name, each row a
/// series of (period end date, value) observations in ascending date order.
#[derive(Debug, Clone, Default)]
pub struct StatementTable {
    rows: HashMap<String, Vec<(NaiveDate, f64)>>,
}

impl StatementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one observation, keeping the row sorted by date.
    pub fn insert(&mut self, line_item: &str, date: NaiveDate, value: f64) {
        let series = self.rows.entry(line_item.to_string()).or_default();
        let idx = series.partition_point(|(d, _)| *d < date);
        series.insert(idx, (date, value));
    }

    pub fn series(&self, line_item: &str) -> Option<&[(NaiveDate, f64)]> {
        self.rows.get(line_item).map(|s| s.as_slice())
    }

    /// Most recent period's value for a line item.
    pub fn latest(&self, line_item: &str) -> Option<f64> {
        self.rows
            .get(line_item)
            .and_then(|s| s.last())
            .map(|(_, v)| *v)
    }

    /// Try each line item in order and return the first one that has data.
    /// This is the uniform "primary key, then fallback key(s)" lookup.
    pub fn latest_of(&self, line_items: &[&str]) -> Option<f64> {
        line_items.iter().find_map(|item| self.latest(item))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A single dividend observation from the provider's history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividendEvent {
    pub ex_date: NaiveDate,
    pub amount: f64,
}

/// Summary info fields used by the extractor. Parse failures upstream degrade
/// to `None` here rather than failing the ticker.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyInfo {
    pub shares_outstanding: Option<f64>,
    pub dividend_yield: Option<f64>,
}

/// Everything fetched for one ticker in a single bulk retrieval. The metric
/// extractor is a pure function of this snapshot.
#[derive(Debug, Clone)]
pub struct TickerFundamentals {
    pub symbol: String,
    pub income_statement: StatementTable,
    pub balance_sheet: StatementTable,
    pub cash_flow: StatementTable,
    /// Ascending by ex-dividend date; may be empty.
    pub dividends: Vec<DividendEvent>,
    pub info: CompanyInfo,
    /// Most recent close; `None` when the price fetch failed.
    pub latest_close: Option<f64>,
}

/// Output column order. The sink writes exactly these headers and the CLI
/// table prints subsets of them.
pub const REPORT_COLUMNS: [&str; 18] = [
    "Ticker",
    "Net Income",
    "Operating Income",
    "EPS",
    "Revenue Growth",
    "Retained Earnings",
    "Cash Reserves",
    "Debt-to-Equity Ratio",
    "Working Capital",
    "Dividend Payout Ratio",
    "Dividend Yield",
    "Free Cash Flow",
    "Dividend Growth Rate",
    "Latest Close Price",
    "Dividend Percentage",
    "Past Dividends",
    "Next Dividend Date",
    "Predicted Dividend Amount",
];

/// Derived metrics for one ticker, one field per output column.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerReport {
    pub symbol: String,
    pub net_income: MetricValue,
    pub operating_income: MetricValue,
    pub eps: MetricValue,
    pub revenue_growth: MetricValue,
    pub retained_earnings: MetricValue,
    pub cash_reserves: MetricValue,
    pub debt_to_equity: MetricValue,
    pub working_capital: MetricValue,
    pub dividend_payout_ratio: MetricValue,
    pub dividend_yield: MetricValue,
    pub free_cash_flow: MetricValue,
    pub dividend_growth_rate: MetricValue,
    pub latest_close_price: MetricValue,
    pub dividend_percentage: MetricValue,
    pub past_dividends: MetricValue,
    pub next_dividend_date: MetricValue,
    pub predicted_dividend_amount: MetricValue,
}

impl TickerReport {
    /// Rendered cells in `REPORT_COLUMNS` order.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.net_income.render(),
            self.operating_income.render(),
            self.eps.render(),
            self.revenue_growth.render(),
            self.retained_earnings.render(),
            self.cash_reserves.render(),
            self.debt_to_equity.render(),
            self.working_capital.render(),
            self.dividend_payout_ratio.render(),
            self.dividend_yield.render(),
            self.free_cash_flow.render(),
            self.dividend_growth_rate.render(),
            self.latest_close_price.render(),
            self.dividend_percentage.render(),
            self.past_dividends.render(),
            self.next_dividend_date.render(),
            self.predicted_dividend_amount.render(),
        ]
    }
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub alpha_vantage_api_key: String,
    pub output_path: String,
    pub rate_limit_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            alpha_vantage_api_key: std::env::var("ALPHA_VANTAGE_API_KEY")
                .map_err(|_| anyhow::anyhow!("ALPHA_VANTAGE_API_KEY environment variable required"))?,
            output_path: std::env::var("OUTPUT_PATH")
                .unwrap_or_else(|_| "dividend_predictions.csv".to_string()),
            rate_limit_per_minute: std::env::var("RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
        })
    }
}
