//! Policy-rate event detection.
//!
//! The policy level series (e.g. the Fed funds target upper limit) is a step
//! function sampled daily. A rate decision shows up as a first-difference
//! larger than the threshold; flat stretches difference to zero and are
//! skipped.

use crate::domain::{RateEvent, TimePoint};

/// Minimum absolute level change that counts as a decision.
///
/// Strictly greater-than: a diff of exactly 0.01 is noise, not an event.
pub const CHANGE_THRESHOLD: f64 = 0.01;

/// Detect rate-change events in a date-ascending level series.
///
/// The first observation can never be an event (nothing to diff against).
/// Non-finite values are excluded before differencing so a missing sample
/// neither becomes a spurious delta nor resets the running level.
pub fn detect_rate_events(levels: &[TimePoint]) -> Vec<RateEvent> {
    let mut events = Vec::new();
    let mut prev: Option<f64> = None;

    for point in levels {
        if !point.value.is_finite() {
            continue;
        }
        if let Some(prior) = prev {
            let delta = point.value - prior;
            if delta.abs() > CHANGE_THRESHOLD {
                events.push(RateEvent {
                    date: point.date,
                    level: point.value,
                    delta,
                });
            }
        }
        prev = Some(point.value);
    }

    events
}
