//! Historical sheet ingest and normalization.
//!
//! This module turns the uploaded "Historical Data Sheet" CSV into clean
//! per-structure series that are safe to analyze.
//!
//! Design goals:
//! - **Strict schema** for the `Timestamp` column (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (first occurrence wins on duplicate dates)
//! - **Separation of concerns**: no statistics or fetching logic here

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::domain::{StructureSeries, TimePoint};
use crate::error::AppError;

const TIMESTAMP_COLUMN: &str = "Timestamp";

/// Spreadsheet tools name filler columns "Unnamed: 3" etc.; those are never
/// selectable structures.
const PLACEHOLDER_PREFIX: &str = "Unnamed";

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// The loaded historical table: one series per selectable structure column.
#[derive(Debug, Clone)]
pub struct HistoricalTable {
    /// Selectable structure columns, in sheet order.
    structure_names: Vec<String>,
    series: HashMap<String, StructureSeries>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl HistoricalTable {
    /// Selectable structure columns (placeholder columns already excluded).
    pub fn structure_names(&self) -> &[String] {
        &self.structure_names
    }

    /// The full (unwindowed) series for one structure column.
    pub fn series(&self, name: &str) -> Option<&StructureSeries> {
        self.series.get(name)
    }
}

/// Load and normalize the historical CSV.
///
/// Rows whose `Timestamp` cannot be parsed are dropped (and reported), never
/// defaulted. Duplicate dates keep the first occurrence. Each structure
/// column becomes a date-ascending series containing only its finite values.
pub fn load_table(path: &Path) -> Result<HistoricalTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::load(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::load(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
    let timestamp_idx = names
        .iter()
        .position(|n| n == TIMESTAMP_COLUMN)
        .ok_or_else(|| {
            AppError::load(format!(
                "CSV '{}' has no '{TIMESTAMP_COLUMN}' column.",
                path.display()
            ))
        })?;

    // One pass yields both the physical index and the name, so a structure
    // can never be paired with the wrong column.
    let columns: Vec<(usize, String)> = names
        .iter()
        .enumerate()
        .filter(|(idx, name)| {
            *idx != timestamp_idx && !name.is_empty() && !name.starts_with(PLACEHOLDER_PREFIX)
        })
        .map(|(idx, name)| (idx, name.clone()))
        .collect();

    if columns.is_empty() {
        return Err(AppError::load(format!(
            "CSV '{}' has no structure columns besides '{TIMESTAMP_COLUMN}'.",
            path.display()
        )));
    }

    // Two columns with the same name would be indistinguishable downstream;
    // refuse instead of guessing which one was meant. The date column's name
    // is reserved too: a second "Timestamp" is just as ambiguous.
    let mut unique = HashSet::from([TIMESTAMP_COLUMN]);
    for (_, name) in &columns {
        if !unique.insert(name.as_str()) {
            return Err(AppError::load(format!(
                "CSV '{}' has duplicate column '{name}'.",
                path.display()
            )));
        }
    }

    let structure_names: Vec<String> = columns.iter().map(|(_, name)| name.clone()).collect();

    let mut points: HashMap<String, Vec<TimePoint>> = structure_names
        .iter()
        .map(|n| (n.clone(), Vec::new()))
        .collect();
    let mut seen_dates: HashSet<NaiveDate> = HashSet::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_used = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let raw_date = field(&record, timestamp_idx);
        let Some(date) = parse_timestamp(raw_date) else {
            row_errors.push(RowError {
                line,
                message: format!("Unparseable {TIMESTAMP_COLUMN} '{raw_date}'; row dropped."),
            });
            continue;
        };

        // First occurrence wins on duplicate dates.
        if !seen_dates.insert(date) {
            row_errors.push(RowError {
                line,
                message: format!("Duplicate {TIMESTAMP_COLUMN} {date}; row dropped."),
            });
            continue;
        }

        rows_used += 1;

        for (col_idx, name) in &columns {
            let raw = field(&record, *col_idx);
            if raw.is_empty() {
                continue; // sparse cell, not an error
            }
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => {
                    if let Some(series) = points.get_mut(name) {
                        series.push(TimePoint::new(date, v));
                    }
                }
                _ => row_errors.push(RowError {
                    line,
                    message: format!("Non-numeric value '{raw}' in column '{name}'; cell dropped."),
                }),
            }
        }
    }

    if rows_used == 0 {
        return Err(AppError::load(format!(
            "No rows with a parseable {TIMESTAMP_COLUMN} remain in '{}'.",
            path.display()
        )));
    }

    // Sheets are usually date-ascending already, but the invariant is ours to
    // enforce: every series ends up strictly increasing.
    let series = points
        .into_iter()
        .map(|(name, mut pts)| {
            pts.sort_by_key(|p| p.date);
            (name.clone(), StructureSeries { name, points: pts })
        })
        .collect();

    Ok(HistoricalTable {
        structure_names,
        series,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn field<'a>(record: &'a StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("").trim()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿Timestamp"). If we don't strip it, schema
    // validation will incorrectly report a missing column.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Parse a timestamp cell in any of the formats real sheets use.
fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d-%b-%Y"];
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M"];

    if raw.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_structures_and_drops_bad_rows() {
        let f = write_csv(
            "Timestamp,SR3-SR1 Jun25,Unnamed: 2\n\
             2025-01-02,0.125,9\n\
             not-a-date,0.130,9\n\
             2025-01-03,0.135,9\n",
        );
        let table = load_table(f.path()).unwrap();

        assert_eq!(table.structure_names(), &["SR3-SR1 Jun25".to_string()]);
        assert_eq!(table.rows_read, 3);
        assert_eq!(table.rows_used, 2);
        assert_eq!(table.row_errors.len(), 1);

        let series = table.series("SR3-SR1 Jun25").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].value, 0.125);
        assert_eq!(series.points[1].value, 0.135);
    }

    #[test]
    fn duplicate_dates_keep_first_occurrence() {
        let f = write_csv(
            "Timestamp,SR3-SR1 Jun25\n\
             2025-01-02,0.10\n\
             2025-01-02,0.99\n",
        );
        let table = load_table(f.path()).unwrap();
        let series = table.series("SR3-SR1 Jun25").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].value, 0.10);
    }

    #[test]
    fn dates_are_strictly_increasing_after_load() {
        let f = write_csv(
            "Timestamp,SR3-SR1 Jun25\n\
             2025-01-05,0.3\n\
             2025-01-02,0.1\n\
             2025-01-03,0.2\n",
        );
        let table = load_table(f.path()).unwrap();
        let series = table.series("SR3-SR1 Jun25").unwrap();
        let dates: Vec<_> = series.points.iter().map(|p| p.date).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sparse_and_malformed_cells() {
        let f = write_csv(
            "Timestamp,SR3-SR1 Jun25,SR3-SR1 Sep25\n\
             2025-01-02,0.10,\n\
             2025-01-03,abc,0.20\n",
        );
        let table = load_table(f.path()).unwrap();
        assert_eq!(table.series("SR3-SR1 Jun25").unwrap().len(), 1);
        assert_eq!(table.series("SR3-SR1 Sep25").unwrap().len(), 1);
        // Only the malformed cell is an error; empty cells are just sparse.
        assert_eq!(table.row_errors.len(), 1);
    }

    #[test]
    fn bom_on_timestamp_header_is_tolerated() {
        let f = write_csv("\u{feff}Timestamp,SR3-SR1 Jun25\n2025-01-02,0.10\n");
        let table = load_table(f.path()).unwrap();
        assert_eq!(table.rows_used, 1);
    }

    #[test]
    fn duplicate_structure_columns_are_rejected() {
        let f = write_csv("Timestamp,SR3-SR1 Jun25,SR3-SR1 Jun25\n2025-01-02,0.10,0.11\n");
        let err = load_table(f.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn second_timestamp_column_is_rejected_not_mispaired() {
        // A stray extra "Timestamp" column must fail loudly; pairing the
        // structure with the date column would silently lose its values.
        let f = write_csv("Timestamp,SR3-SR1 Jun25,Timestamp\n2025-01-02,0.125,0.999\n");
        let err = load_table(f.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn columns_pair_with_their_own_values() {
        let f = write_csv(
            "Timestamp,SR3-SR1 Jun25,Unnamed: 2,SR3-SR1 Sep25\n\
             2025-01-02,0.125,9,0.250\n",
        );
        let table = load_table(f.path()).unwrap();
        let jun = table.series("SR3-SR1 Jun25").unwrap();
        let sep = table.series("SR3-SR1 Sep25").unwrap();
        assert_eq!(jun.points[0].value, 0.125);
        assert_eq!(sep.points[0].value, 0.250);
    }

    #[test]
    fn missing_timestamp_column_is_a_load_error() {
        let f = write_csv("Date,SR3-SR1 Jun25\n2025-01-02,0.10\n");
        let err = load_table(f.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_table(Path::new("/nonexistent/sheet.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn slash_and_datetime_timestamps_parse() {
        let f = write_csv(
            "Timestamp,SR3-SR1 Jun25\n\
             01/02/2025,0.10\n\
             2025-01-03 15:30:00,0.11\n",
        );
        let table = load_table(f.path()).unwrap();
        let series = table.series("SR3-SR1 Jun25").unwrap();
        assert_eq!(series.points[0].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(series.points[1].date, NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());
    }
}
