//! Common test utilities and helpers

pub mod test_data {
    use chrono::NaiveDate;
    use dividend_scan::models::{
        line_items, CompanyInfo, DividendEvent, StatementTable, TickerFundamentals,
    };

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn dividend(y: i32, m: u32, d: u32, amount: f64) -> DividendEvent {
        DividendEvent {
            ex_date: date(y, m, d),
            amount,
        }
    }

    /// A snapshot with no statement rows, no dividends and no close price.
    pub fn empty_fundamentals(symbol: &str) -> TickerFundamentals {
        TickerFundamentals {
            symbol: symbol.to_string(),
            income_statement: StatementTable::new(),
            balance_sheet: StatementTable::new(),
            cash_flow: StatementTable::new(),
            dividends: Vec::new(),
            info: CompanyInfo::default(),
            latest_close: None,
        }
    }

    /// A fully populated snapshot with two fiscal years of statements and a
    /// year of quarterly dividends.
    pub fn fundamentals_with_everything(symbol: &str) -> TickerFundamentals {
        let mut income = StatementTable::new();
        income.insert(line_items::NET_INCOME, date(2023, 12, 31), 900.0);
        income.insert(line_items::NET_INCOME, date(2024, 12, 31), 1000.0);
        income.insert(line_items::OPERATING_INCOME, date(2024, 12, 31), 1200.0);
        income.insert(line_items::EBIT, date(2024, 12, 31), 1100.0);
        income.insert(line_items::TOTAL_REVENUE, date(2023, 12, 31), 4000.0);
        income.insert(line_items::TOTAL_REVENUE, date(2024, 12, 31), 5000.0);

        let mut balance = StatementTable::new();
        balance.insert(line_items::RETAINED_EARNINGS, date(2024, 12, 31), 2500.0);
        balance.insert(line_items::CASH, date(2024, 12, 31), 800.0);
        balance.insert(line_items::TOTAL_DEBT, date(2024, 12, 31), 600.0);
        balance.insert(line_items::STOCKHOLDERS_EQUITY, date(2024, 12, 31), 1500.0);
        balance.insert(line_items::TOTAL_ASSETS, date(2024, 12, 31), 7000.0);
        balance.insert(line_items::TOTAL_LIABILITIES, date(2024, 12, 31), 4500.0);

        let mut cash_flow = StatementTable::new();
        cash_flow.insert(line_items::FREE_CASH_FLOW, date(2024, 12, 31), 750.0);

        TickerFundamentals {
            symbol: symbol.to_string(),
            income_statement: income,
            balance_sheet: balance,
            cash_flow,
            dividends: vec![
                dividend(2024, 2, 9, 0.24),
                dividend(2024, 5, 10, 0.25),
                dividend(2024, 8, 9, 0.25),
                dividend(2024, 11, 8, 0.25),
            ],
            info: CompanyInfo {
                shares_outstanding: Some(100.0),
                dividend_yield: Some(0.0065),
            },
            latest_close: Some(50.0),
        }
    }
}
