//! Loading the ticker list from a tabular input file. CSV is read with the
//! `csv` crate, Excel workbooks with `calamine`; both require a column named
//! exactly `Symbol`.

use anyhow::{anyhow, Context, Result};
use std::path::Path;

const SYMBOL_COLUMN: &str = "Symbol";

/// Read ticker symbols from `path`, in file order. Blank cells are skipped
/// and values are trimmed.
pub fn load_symbols(path: &Path) -> Result<Vec<String>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("xlsx") | Some("xls") => load_from_workbook(path),
        _ => load_from_csv(path),
    }
}

fn load_from_csv(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open symbols file {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let symbol_idx = headers
        .iter()
        .position(|h| h == SYMBOL_COLUMN)
        .ok_or_else(|| {
            anyhow!(
                "the symbols file must contain a '{}' column with stock tickers",
                SYMBOL_COLUMN
            )
        })?;

    let mut symbols = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(cell) = record.get(symbol_idx) {
            let symbol = cell.trim();
            if !symbol.is_empty() {
                symbols.push(symbol.to_string());
            }
        }
    }
    Ok(symbols)
}

fn load_from_workbook(path: &Path) -> Result<Vec<String>> {
    use calamine::{open_workbook_auto, Reader};

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| anyhow!("failed to open workbook {}: {}", path.display(), e))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names
        .first()
        .ok_or_else(|| anyhow!("workbook {} has no worksheets", path.display()))?;

    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| anyhow!("failed to read worksheet '{}': {}", first_sheet, e))?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| anyhow!("worksheet '{}' is empty", first_sheet))?;

    let symbol_idx = header_row
        .iter()
        .position(|cell| cell_to_string(cell) == SYMBOL_COLUMN)
        .ok_or_else(|| {
            anyhow!(
                "the symbols file must contain a '{}' column with stock tickers",
                SYMBOL_COLUMN
            )
        })?;

    let mut symbols = Vec::new();
    for row in rows {
        if let Some(cell) = row.get(symbol_idx) {
            let symbol = cell_to_string(cell);
            let symbol = symbol.trim();
            if !symbol.is_empty() {
                symbols.push(symbol.to_string());
            }
        }
    }
    Ok(symbols)
}

fn cell_to_string(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) => format!("{}", f),
        calamine::Data::Int(i) => format!("{}", i),
        calamine::Data::Bool(b) => format!("{}", b),
        calamine::Data::DateTime(dt) => format!("{}", dt),
        calamine::Data::Error(e) => format!("{:?}", e),
        calamine::Data::Empty => String::new(),
        _ => String::new(),
    }
}
