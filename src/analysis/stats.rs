//! Descriptive statistics and the richness/cheapness score.

use crate::domain::{SeriesStats, StructureSeries, Valuation};

/// Z-score band outside which a structure is flagged rich/cheap.
///
/// Exclusive on both sides: exactly 1.5 standard deviations is still fair.
pub const VALUATION_BAND: f64 = 1.5;

/// Compute descriptive statistics over a windowed structure series.
///
/// Returns `None` for an empty series. A single-point or zero-variance
/// series is valid but degenerate: `std_dev` and `z_score` come back NaN
/// (informational, not an error).
pub fn compute_stats(series: &StructureSeries) -> Option<SeriesStats> {
    let values = series.values();
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let current = values[values.len() - 1];

    let mut min = values[0];
    let mut max = values[0];
    for &v in &values {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }

    // Sample standard deviation (n-1 denominator), NaN for a single point.
    let std_dev = if values.len() > 1 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        variance.sqrt()
    } else {
        f64::NAN
    };

    let z_score = if values.len() < 2 || std_dev == 0.0 {
        f64::NAN
    } else {
        (current - mean) / std_dev
    };

    Some(SeriesStats {
        mean,
        median: median(&values),
        std_dev,
        min,
        max,
        current,
        z_score,
    })
}

/// Classify a z-score into rich/cheap/fair.
///
/// NaN compares false against both bands and therefore classifies as fair.
pub fn classify(z_score: f64) -> Valuation {
    if z_score > VALUATION_BAND {
        Valuation::Rich
    } else if z_score < -VALUATION_BAND {
        Valuation::Cheap
    } else {
        Valuation::Fair
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
