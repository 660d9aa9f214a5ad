use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use dividend_scan::api::AlphaVantageClient;
use dividend_scan::batch::{run_batch, BatchOutcome};
use dividend_scan::models::{Config, TickerReport};
use dividend_scan::sink::append_reports;
use dividend_scan::symbols::load_symbols;

/// Fetch financial metrics and dividend predictions for a list of tickers.
#[derive(Debug, Parser)]
#[command(name = "dividend-scan", version)]
struct Args {
    /// CSV or XLSX file with a 'Symbol' column listing stock tickers
    symbols_file: PathBuf,

    /// Results file to append to (defaults to OUTPUT_PATH from the environment)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print results without appending them to the results file
    #[arg(long)]
    no_save: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter("dividend_scan=info")
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration Error: {}", e);
            eprintln!("Make sure you have a .env file with ALPHA_VANTAGE_API_KEY set.");
            std::process::exit(1);
        }
    };

    // Load the ticker list
    let symbols = match load_symbols(&args.symbols_file) {
        Ok(symbols) => symbols,
        Err(e) => {
            eprintln!("❌ Symbols Error: {}", e);
            std::process::exit(1);
        }
    };
    if symbols.is_empty() {
        println!("No symbols found in {}", args.symbols_file.display());
        return Ok(());
    }
    println!(
        "📊 Loaded {} symbols from {}",
        symbols.len(),
        args.symbols_file.display()
    );

    let client = AlphaVantageClient::new(&config)?;
    let outcome = run_batch(&client, &symbols).await;

    for failure in &outcome.failures {
        eprintln!("❌ Skipped {}: {}", failure.symbol, failure.reason);
    }

    if outcome.reports.is_empty() {
        println!("No results to display.");
        return Ok(());
    }

    print_financial_metrics(&outcome.reports);
    print_dividend_outlook(&outcome.reports);
    print_summary(&outcome);

    if !args.no_save {
        let output_path = args
            .output
            .unwrap_or_else(|| PathBuf::from(&config.output_path));
        match append_reports(&output_path, &outcome.reports) {
            Ok(()) => println!("✅ Results saved to {}", output_path.display()),
            Err(e) => eprintln!("❌ Error saving results: {}", e),
        }
    }

    Ok(())
}

fn print_financial_metrics(reports: &[TickerReport]) {
    println!("\n=== Financial Metrics ===");
    println!(
        "{:<8} {:>16} {:>16} {:>10} {:>10} {:>14} {:>16} {:>16} {:>10}",
        "Ticker",
        "Net Income",
        "Oper. Income",
        "EPS",
        "Rev Growth",
        "Debt/Equity",
        "Working Cap",
        "Free Cash Flow",
        "Close"
    );
    println!("{}", "-".repeat(124));

    for report in reports {
        println!(
            "{:<8} {:>16} {:>16} {:>10} {:>10} {:>14} {:>16} {:>16} {:>10}",
            report.symbol,
            report.net_income,
            report.operating_income,
            report.eps,
            report.revenue_growth,
            report.debt_to_equity,
            report.working_capital,
            report.free_cash_flow,
            report.latest_close_price
        );
    }
}

fn print_dividend_outlook(reports: &[TickerReport]) {
    println!("\n=== Dividend Outlook ===");
    println!(
        "{:<8} {:>10} {:>12} {:>12} {:>14} {:>10}  {}",
        "Ticker",
        "Yield",
        "Growth Rate",
        "Div %",
        "Next Date",
        "Predicted",
        "Past Dividends"
    );
    println!("{}", "-".repeat(110));

    for report in reports {
        println!(
            "{:<8} {:>10} {:>12} {:>12} {:>14} {:>10}  {}",
            report.symbol,
            report.dividend_yield,
            report.dividend_growth_rate,
            report.dividend_percentage,
            report.next_dividend_date,
            report.predicted_dividend_amount,
            report.past_dividends
        );
    }
}

fn print_summary(outcome: &BatchOutcome) {
    println!(
        "\n✅ Processed {} of {} tickers ({} skipped)",
        outcome.reports.len(),
        outcome.total_processed(),
        outcome.failures.len()
    );
}
