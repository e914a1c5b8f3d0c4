//! Series alignment: left-merge structure prices with the reference rate.

use std::collections::HashMap;

use crate::domain::{MergedRow, StructureSeries, TimePoint};
use crate::error::AppError;

/// Left-merge `primary` with `reference` on exact date equality.
///
/// Every primary date appears exactly once in the output, in primary order;
/// reference-only dates are dropped, and unmatched primary dates carry
/// `reference = None`. Duplicate dates in the reference series indicate a
/// broken upstream feed and are rejected rather than silently resolved.
pub fn left_merge(
    primary: &StructureSeries,
    reference: &[TimePoint],
) -> Result<Vec<MergedRow>, AppError> {
    let mut by_date: HashMap<_, _> = HashMap::with_capacity(reference.len());
    for point in reference {
        if by_date.insert(point.date, point.value).is_some() {
            return Err(AppError::data(format!(
                "Duplicate reference observation for {} — refusing to pick one.",
                point.date
            )));
        }
    }

    Ok(primary
        .points
        .iter()
        .map(|p| MergedRow {
            date: p.date,
            structure: p.value,
            reference: by_date.get(&p.date).copied(),
        })
        .collect())
}
