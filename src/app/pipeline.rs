//! Shared analysis pipeline used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve window -> filter -> statistics -> fetch -> events -> merge
//!
//! The front-end then focuses on presentation (printing and exports). The
//! pipeline itself is pure: external data arrives through the `RateSource`
//! seam, and a missing or failing source degrades the run to structure-only
//! analysis instead of failing it.

use crate::analysis::{classify, compute_stats, detect_rate_events, left_merge, resolve_window};
use crate::data::fred::{RateSource, SERIES_FED_TARGET_UPPER, SERIES_SOFR};
use crate::domain::{AnalysisWindow, MergedRow, RateEvent, SeriesStats, StructureSeries, Valuation};
use crate::error::AppError;
use crate::io::ingest::HistoricalTable;

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub structure: String,
    pub window: AnalysisWindow,
    /// The structure series restricted to the window.
    pub windowed: StructureSeries,
    /// `None` when the window holds no observations (informational state).
    pub stats: Option<SeriesStats>,
    pub valuation: Option<Valuation>,
    pub frame: Vec<MergedRow>,
    pub events: Vec<RateEvent>,
    /// Present when reference/event data was unavailable and the run degraded.
    pub fetch_note: Option<String>,
}

/// Execute the full analysis for one structure column.
///
/// `source` is the (possibly cache-fronted) rate source; `None` means run
/// offline. Fetch failures are recovered locally — only a missing structure,
/// an unparseable identifier, or inconsistent reference data are errors.
pub fn run_analysis(
    table: &HistoricalTable,
    structure: &str,
    source: Option<&dyn RateSource>,
) -> Result<RunOutput, AppError> {
    let series = table.series(structure).ok_or_else(|| {
        AppError::parse(format!("Unknown structure column '{structure}'."))
    })?;

    let window = resolve_window(structure).ok_or_else(|| {
        AppError::parse(format!(
            "Could not parse structure name '{structure}'. Expected the format 'SR3-SR1 MonYY'."
        ))
    })?;

    let windowed = series.restrict(&window);
    let stats = compute_stats(&windowed);
    let valuation = stats.map(|s| classify(s.z_score));

    let mut notes = Vec::new();
    let mut reference = Vec::new();
    let mut levels = Vec::new();

    match source {
        Some(source) => {
            match source.fetch_series(SERIES_SOFR, window.start, window.end) {
                Ok(obs) => reference = obs,
                Err(e) => notes.push(format!("SOFR unavailable ({e})")),
            }
            match source.fetch_series(SERIES_FED_TARGET_UPPER, window.start, window.end) {
                Ok(obs) => levels = obs,
                Err(e) => notes.push(format!("Fed target series unavailable ({e})")),
            }
        }
        None => notes.push("offline mode, market context skipped".to_string()),
    }

    let frame = left_merge(&windowed, &reference)?;
    let events = detect_rate_events(&levels);

    Ok(RunOutput {
        structure: structure.to_string(),
        window,
        windowed,
        stats,
        valuation,
        frame,
        events,
        fetch_note: if notes.is_empty() {
            None
        } else {
            Some(notes.join("; "))
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fred::FetchError;
    use crate::domain::TimePoint;
    use crate::io::ingest::load_table;
    use chrono::NaiveDate;
    use std::io::Write;

    struct StaticSource {
        sofr: Vec<TimePoint>,
        levels: Vec<TimePoint>,
        fail: bool,
    }

    impl RateSource for StaticSource {
        fn fetch_series(
            &self,
            series_id: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<TimePoint>, FetchError> {
            if self.fail {
                return Err(FetchError::new("boom"));
            }
            match series_id {
                SERIES_SOFR => Ok(self.sofr.clone()),
                SERIES_FED_TARGET_UPPER => Ok(self.levels.clone()),
                other => Err(FetchError::new(format!("unknown series {other}"))),
            }
        }
    }

    fn table_with(rows: &str) -> HistoricalTable {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(rows.as_bytes()).unwrap();
        load_table(f.path()).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn full_run_merges_and_detects_events() {
        let table = table_with(
            "Timestamp,SR3-SR1 Jun25\n\
             2025-03-03,0.10\n\
             2025-03-04,0.12\n\
             2025-03-05,0.16\n",
        );
        let source = StaticSource {
            sofr: vec![
                TimePoint::new(ymd(2025, 3, 4), 4.33),
                TimePoint::new(ymd(2025, 3, 5), 4.31),
            ],
            levels: vec![
                TimePoint::new(ymd(2025, 3, 3), 4.50),
                TimePoint::new(ymd(2025, 3, 4), 4.25),
            ],
            fail: false,
        };

        let run = run_analysis(&table, "SR3-SR1 Jun25", Some(&source)).unwrap();

        assert_eq!(run.window.end, ymd(2025, 6, 30));
        assert_eq!(run.windowed.len(), 3);
        assert!(run.fetch_note.is_none());

        let stats = run.stats.unwrap();
        assert_eq!(stats.current, 0.16);

        assert_eq!(run.frame.len(), 3);
        assert_eq!(run.frame[0].reference, None);
        assert_eq!(run.frame[1].reference, Some(4.33));

        assert_eq!(run.events.len(), 1);
        assert!((run.events[0].delta + 0.25).abs() < 1e-12);
    }

    #[test]
    fn fetch_failure_degrades_instead_of_failing() {
        let table = table_with("Timestamp,SR3-SR1 Jun25\n2025-03-03,0.10\n");
        let source = StaticSource {
            sofr: vec![],
            levels: vec![],
            fail: true,
        };

        let run = run_analysis(&table, "SR3-SR1 Jun25", Some(&source)).unwrap();
        assert!(run.fetch_note.is_some());
        assert!(run.events.is_empty());
        assert!(run.frame.iter().all(|r| r.reference.is_none()));
        assert!(run.stats.is_some());
    }

    #[test]
    fn offline_run_is_structure_only() {
        let table = table_with("Timestamp,SR3-SR1 Jun25\n2025-03-03,0.10\n");
        let run = run_analysis(&table, "SR3-SR1 Jun25", None).unwrap();
        assert!(run.fetch_note.unwrap().contains("offline"));
        assert!(run.events.is_empty());
    }

    #[test]
    fn empty_fetch_result_needs_no_special_path() {
        let table = table_with("Timestamp,SR3-SR1 Jun25\n2025-03-03,0.10\n");
        let source = StaticSource {
            sofr: vec![],
            levels: vec![],
            fail: false,
        };
        let run = run_analysis(&table, "SR3-SR1 Jun25", Some(&source)).unwrap();
        assert!(run.fetch_note.is_none());
        assert!(run.events.is_empty());
        assert!(run.frame.iter().all(|r| r.reference.is_none()));
    }

    #[test]
    fn unparseable_identifier_is_a_parse_failure() {
        let table = table_with("Timestamp,SR3-SR1 spread\n2025-03-03,0.10\n");
        let err = run_analysis(&table, "SR3-SR1 spread", None).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn unknown_structure_is_a_parse_failure() {
        let table = table_with("Timestamp,SR3-SR1 Jun25\n2025-03-03,0.10\n");
        let err = run_analysis(&table, "SR3-SR1 Sep25", None).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn empty_window_is_informational_not_an_error() {
        // All observations fall outside the Jun25 window.
        let table = table_with("Timestamp,SR3-SR1 Jun25\n2020-01-02,0.10\n");
        let run = run_analysis(&table, "SR3-SR1 Jun25", None).unwrap();
        assert!(run.stats.is_none());
        assert!(run.valuation.is_none());
        assert!(run.frame.is_empty());
    }
}
