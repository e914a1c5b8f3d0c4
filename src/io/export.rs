//! Export the merged analysis frame to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per structure date, empty cell where the reference series
//! had no observation.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::MergedRow;
use crate::error::AppError;

const HEADER: &str = "date,structure_value,reference_value";

/// Write the merged frame to a CSV file.
pub fn write_frame_csv(path: &Path, rows: &[MergedRow]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::load(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "{HEADER}")
        .map_err(|e| AppError::load(format!("Failed to write export CSV header: {e}")))?;

    for row in rows {
        writeln!(
            file,
            "{},{},{}",
            row.date,
            fmt_value(row.structure),
            row.reference.map(fmt_value).unwrap_or_default(),
        )
        .map_err(|e| AppError::load(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Re-load a previously exported frame.
///
/// Inverse of [`write_frame_csv`]; absent reference cells come back as `None`.
pub fn read_frame_csv(path: &Path) -> Result<Vec<MergedRow>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::load(format!("Failed to open frame CSV '{}': {e}", path.display())))?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::load(format!("Frame CSV line {line}: {e}")))?;

        let raw_date = record.get(0).unwrap_or("");
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
            AppError::load(format!("Frame CSV line {line}: bad date '{raw_date}': {e}"))
        })?;

        let structure = record
            .get(1)
            .unwrap_or("")
            .parse::<f64>()
            .map_err(|e| AppError::load(format!("Frame CSV line {line}: bad value: {e}")))?;

        let reference = match record.get(2).unwrap_or("") {
            "" => None,
            raw => Some(raw.parse::<f64>().map_err(|e| {
                AppError::load(format!("Frame CSV line {line}: bad reference value: {e}"))
            })?),
        };

        rows.push(MergedRow {
            date,
            structure,
            reference,
        });
    }

    Ok(rows)
}

/// Full round-trip precision; trailing zeros are not meaningful here.
fn fmt_value(v: f64) -> String {
    format!("{v}")
}
