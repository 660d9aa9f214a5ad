//! Symbol loader tests

use pretty_assertions::assert_eq;
use test_log::test;

use dividend_scan::symbols::load_symbols;

fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn reads_the_symbol_column_in_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "symbols.csv",
        "Name,Symbol\nApple,AAPL\nMicrosoft,MSFT\nCoca-Cola,KO\n",
    );

    let symbols = load_symbols(&path).unwrap();
    assert_eq!(symbols, vec!["AAPL", "MSFT", "KO"]);
}

#[test]
fn requires_an_exact_symbol_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "symbols.csv", "Ticker,Name\nAAPL,Apple\n");

    let err = load_symbols(&path).unwrap_err();
    assert!(err.to_string().contains("'Symbol' column"));

    // Case matters: "symbol" is not "Symbol".
    let lower = write_csv(&dir, "lower.csv", "symbol\nAAPL\n");
    assert!(load_symbols(&lower).is_err());
}

#[test]
fn skips_blank_cells_and_trims_whitespace() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "symbols.csv",
        "Symbol\n AAPL \n\nMSFT\n   \n",
    );

    let symbols = load_symbols(&path).unwrap();
    assert_eq!(symbols, vec!["AAPL", "MSFT"]);
}

#[test]
fn missing_file_is_a_descriptive_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.csv");

    let err = load_symbols(&path).unwrap_err();
    assert!(err.to_string().contains("failed to open symbols file"));
}
