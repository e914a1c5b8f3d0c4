//! Explicit fetch memoization.
//!
//! Repeated analyses of the same structure hit FRED with identical windowed
//! requests; `FetchCache` fronts any `RateSource` with a request-keyed map.
//! Invalidation is explicit (`invalidate_all`), never implicit — the analysis
//! core behaves identically on cold and cached results.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::data::fred::{FetchError, RateSource};
use crate::domain::TimePoint;

type CacheKey = (String, NaiveDate, NaiveDate);

pub struct FetchCache<S> {
    inner: S,
    entries: RefCell<HashMap<CacheKey, Vec<TimePoint>>>,
}

impl<S: RateSource> FetchCache<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Drop all cached series; the next fetch goes back to the source.
    pub fn invalidate_all(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<S: RateSource> RateSource for FetchCache<S> {
    fn fetch_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TimePoint>, FetchError> {
        let key = (series_id.to_string(), start, end);
        if let Some(hit) = self.entries.borrow().get(&key) {
            return Ok(hit.clone());
        }

        // Only successes are cached; a transient failure should be retried
        // on the next request.
        let series = self.inner.fetch_series(series_id, start, end)?;
        self.entries.borrow_mut().insert(key, series.clone());
        Ok(series)
    }
}
