//! FRED API integration for SOFR and the Fed funds target series.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::TimePoint;
use crate::error::AppError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Secured Overnight Financing Rate — the reference series.
pub const SERIES_SOFR: &str = "SOFR";
/// Fed funds target rate, upper limit — the policy level series.
pub const SERIES_FED_TARGET_UPPER: &str = "DFEDTARU";

/// A failed or unusable fetch.
///
/// Deliberately not an `AppError`: the pipeline recovers from this locally by
/// running a structure-only analysis, so it never carries an exit code.
#[derive(Debug, Clone)]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FetchError {}

/// Source of date-indexed rate observations for a `[start, end]` window.
///
/// The pipeline only ever sees this trait, so fetch results reach the
/// analysis core as plain values and tests can substitute in-memory data.
pub trait RateSource {
    fn fetch_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TimePoint>, FetchError>;
}

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::load("Missing FRED_API_KEY in environment (.env)."))?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }
}

impl RateSource for FredClient {
    fn fetch_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TimePoint>, FetchError> {
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", series_id),
                ("api_key", &self.api_key),
                ("file_type", "json"),
                ("observation_start", &start.to_string()),
                ("observation_end", &end.to_string()),
            ])
            .send()
            .map_err(|e| FetchError::new(format!("FRED request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(FetchError::new(format!(
                "FRED request for {series_id} failed with status {}.",
                resp.status()
            )));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| FetchError::new(format!("Failed to parse FRED response: {e}")))?;

        let mut out = Vec::new();
        for obs in body.observations {
            // FRED marks missing observations with "."; skip them rather than
            // letting them become zeros.
            let Some(value) = parse_value(&obs.value) else {
                continue;
            };
            let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
                .map_err(|e| FetchError::new(format!("Invalid FRED date '{}': {e}", obs.date)))?;
            out.push(TimePoint::new(date, value));
        }

        // FRED returns ascending dates for this endpoint; keep the guarantee
        // explicit since the event detector depends on it.
        out.sort_by_key(|p| p.date);
        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
