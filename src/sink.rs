//! Result persistence. Appends batches of ticker reports to a CSV file,
//! writing the header row only when the file is newly created. Existing rows
//! are never rewritten.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;

use crate::models::{TickerReport, REPORT_COLUMNS};

/// Append one row per report to the spreadsheet at `path`, creating it with
/// a header row if it does not exist yet.
pub fn append_reports(path: &Path, reports: &[TickerReport]) -> Result<()> {
    let is_new = !path.exists()
        || std::fs::metadata(path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open results file {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if is_new {
        writer
            .write_record(&REPORT_COLUMNS)
            .context("failed to write header row")?;
    }

    for report in reports {
        writer
            .write_record(report.cells())
            .with_context(|| format!("failed to write row for {}", report.symbol))?;
    }

    writer.flush().context("failed to flush results file")?;
    Ok(())
}
