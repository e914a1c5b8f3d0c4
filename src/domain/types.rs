//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - used in-memory during analysis
//! - exported to CSV (via `io::export`)
//! - reloaded later for comparisons

use std::path::PathBuf;

use chrono::NaiveDate;

/// A single dated observation.
///
/// Used for structure prices, reference-rate observations, and policy-rate
/// levels alike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TimePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// An ordered-by-date price series for one named structure column.
///
/// Invariant (enforced at load time in `io::ingest`): dates are strictly
/// increasing — duplicates were dropped first-occurrence-wins and rows with
/// unparseable dates were discarded.
#[derive(Debug, Clone)]
pub struct StructureSeries {
    pub name: String,
    pub points: Vec<TimePoint>,
}

impl StructureSeries {
    /// Restrict the series to `[window.start, window.end]` (inclusive).
    pub fn restrict(&self, window: &AnalysisWindow) -> StructureSeries {
        StructureSeries {
            name: self.name.clone(),
            points: self
                .points
                .iter()
                .copied()
                .filter(|p| window.contains(p.date))
                .collect(),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// The fixed look-back period ending at a contract's last calendar day.
///
/// `end` is the last day of the contract month encoded in the structure
/// identifier; `start` is exactly 240 days earlier (fixed-day arithmetic,
/// not "8 months back" — the two are not equivalent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalysisWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A detected policy-rate change.
///
/// `delta` is the signed change from the immediately preceding observation in
/// the level series; only changes with `|delta| > 0.01` are retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateEvent {
    pub date: NaiveDate,
    /// Level after the change.
    pub level: f64,
    pub delta: f64,
}

impl RateEvent {
    /// `delta > 0` is a hike, `delta < 0` a cut.
    pub fn is_hike(&self) -> bool {
        self.delta > 0.0
    }
}

/// One row of the merged analysis frame.
///
/// `reference` is `None` when the reference series has no observation for
/// this date (left-merge semantics: structure dates are authoritative).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedRow {
    pub date: NaiveDate,
    pub structure: f64,
    pub reference: Option<f64>,
}

/// Descriptive statistics over one structure series within a window.
///
/// `z_score` is NaN when the window holds fewer than two points or has zero
/// variance; that is an informational state, not an error.
#[derive(Debug, Clone, Copy)]
pub struct SeriesStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Value of the last point in date order within the window.
    pub current: f64,
    pub z_score: f64,
}

/// Richness/cheapness classification of the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Valuation {
    Rich,
    Cheap,
    Fair,
}

impl Valuation {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Valuation::Rich => "Rich Territory",
            Valuation::Cheap => "Cheap Territory",
            Valuation::Fair => "Fair Value Range",
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub csv_path: PathBuf,
    /// Structure column to analyze; `None` selects the first available column.
    pub structure: Option<String>,
    /// Skip the FRED fetch entirely (structure-only analysis).
    pub offline: bool,
    /// Write the merged frame to this CSV path.
    pub export: Option<PathBuf>,
}
