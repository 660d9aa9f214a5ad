//! Per-ticker metric derivation. Pure functions of a fetched
//! `TickerFundamentals` snapshot; every lookup degrades to the `N/A`
//! sentinel instead of erroring, so no metric can abort the others.

use chrono::{Duration, NaiveDate};

use crate::models::{
    line_items, DividendEvent, MetricValue, TickerFundamentals, TickerReport,
};

/// How many trailing dividends feed the "past dividends" list and the
/// next-date estimate.
const RECENT_DIVIDEND_WINDOW: usize = 10;

/// Derive the full metric set for one ticker.
pub fn derive_metrics(fundamentals: &TickerFundamentals) -> TickerReport {
    let income = &fundamentals.income_statement;
    let balance = &fundamentals.balance_sheet;
    let cash_flow = &fundamentals.cash_flow;
    let dividends = &fundamentals.dividends;
    let info = &fundamentals.info;
    let latest_close = fundamentals.latest_close;

    let eps = match (income.latest(line_items::EBIT), info.shares_outstanding) {
        (Some(ebit), Some(shares)) if shares != 0.0 => MetricValue::Number(ebit / shares),
        _ => MetricValue::Unavailable,
    };

    let debt_to_equity = match (
        balance.latest(line_items::TOTAL_DEBT),
        balance.latest(line_items::STOCKHOLDERS_EQUITY),
    ) {
        (Some(debt), Some(equity)) if equity != 0.0 => MetricValue::Number(debt / equity),
        _ => MetricValue::Unavailable,
    };

    let working_capital = match (
        balance.latest(line_items::TOTAL_ASSETS),
        balance.latest(line_items::TOTAL_LIABILITIES),
    ) {
        (Some(assets), Some(liabilities)) => MetricValue::Number(assets - liabilities),
        _ => MetricValue::Unavailable,
    };

    // The payout ratio and the yield both come from the provider's single
    // dividend-yield field. Kept as observed upstream behavior.
    let dividend_yield = MetricValue::from_option(info.dividend_yield);

    let dividend_percentage = match (dividends.last(), latest_close) {
        (Some(last), Some(close)) if close != 0.0 => {
            MetricValue::Number(last.amount / close * 100.0)
        }
        _ => MetricValue::Unavailable,
    };

    let past_dividends = if dividends.is_empty() {
        MetricValue::Unavailable
    } else {
        let recent = recent_dividends(dividends);
        MetricValue::Series(recent.iter().map(|d| d.amount).collect())
    };

    let next_dividend_date = match estimate_next_dividend_date(dividends) {
        Some(date) => MetricValue::Text(date.format("%Y-%m-%d").to_string()),
        None => MetricValue::Unavailable,
    };

    TickerReport {
        symbol: fundamentals.symbol.clone(),
        net_income: MetricValue::from_option(income.latest(line_items::NET_INCOME)),
        operating_income: MetricValue::from_option(
            income.latest_of(&[line_items::OPERATING_INCOME, line_items::EBIT]),
        ),
        eps,
        revenue_growth: MetricValue::from_option(latest_growth(
            income.series(line_items::TOTAL_REVENUE),
        )),
        retained_earnings: MetricValue::from_option(
            balance.latest(line_items::RETAINED_EARNINGS),
        ),
        cash_reserves: MetricValue::from_option(balance.latest(line_items::CASH)),
        debt_to_equity,
        working_capital,
        dividend_payout_ratio: dividend_yield.clone(),
        dividend_yield,
        free_cash_flow: MetricValue::from_option(
            cash_flow.latest(line_items::FREE_CASH_FLOW),
        ),
        dividend_growth_rate: MetricValue::from_option(mean_dividend_growth(dividends)),
        latest_close_price: MetricValue::from_option(latest_close),
        dividend_percentage,
        past_dividends,
        next_dividend_date,
        predicted_dividend_amount: MetricValue::from_option(
            dividends.last().map(|d| d.amount),
        ),
    }
}

/// Period-over-period fractional change between the two most recent
/// observations of a statement row.
fn latest_growth(series: Option<&[(NaiveDate, f64)]>) -> Option<f64> {
    let series = series?;
    if series.len() < 2 {
        return None;
    }
    let previous = series[series.len() - 2].1;
    let latest = series[series.len() - 1].1;
    if previous == 0.0 {
        return None;
    }
    Some((latest - previous) / previous)
}

/// Mean fractional change between consecutive payments across the full
/// history. Pairs with a zero base are skipped.
fn mean_dividend_growth(dividends: &[DividendEvent]) -> Option<f64> {
    let changes: Vec<f64> = dividends
        .windows(2)
        .filter(|pair| pair[0].amount != 0.0)
        .map(|pair| (pair[1].amount - pair[0].amount) / pair[0].amount)
        .collect();

    if changes.is_empty() {
        return None;
    }
    Some(changes.iter().sum::<f64>() / changes.len() as f64)
}

/// Up to the last `RECENT_DIVIDEND_WINDOW` payments, still in ascending
/// date order.
fn recent_dividends(dividends: &[DividendEvent]) -> &[DividendEvent] {
    let start = dividends.len().saturating_sub(RECENT_DIVIDEND_WINDOW);
    &dividends[start..]
}

/// Last ex-date plus the mean day gap between the recent payments. Undefined
/// with fewer than two observations.
fn estimate_next_dividend_date(dividends: &[DividendEvent]) -> Option<NaiveDate> {
    let recent = recent_dividends(dividends);
    if recent.len() < 2 {
        return None;
    }

    let total_gap_days: i64 = recent
        .windows(2)
        .map(|pair| (pair[1].ex_date - pair[0].ex_date).num_days())
        .sum();
    let mean_gap = total_gap_days as f64 / (recent.len() - 1) as f64;

    let last = recent[recent.len() - 1].ex_date;
    last.checked_add_signed(Duration::days(mean_gap.round() as i64))
}
