//! Contract period resolution.
//!
//! Structure columns embed their contract month as `<Mon><YY>` somewhere in
//! the name — both "SR3-SR1 Jun25" and "SR3-SR1Jun25" occur in real sheets.
//! We scan for the first such substring and derive the analysis window from
//! it: window end = last calendar day of the contract month, window start =
//! end minus a fixed 240 days.
//!
//! The scanner is deliberately a tagged lookup (`Some`/`None`), not an
//! exception-driven parse: an identifier without a recognizable contract
//! month is a distinct outcome, never a default window.

use chrono::{Duration, NaiveDate};

use crate::domain::AnalysisWindow;

/// Look-back length in days. Fixed-day arithmetic, roughly 8 months.
pub const LOOKBACK_DAYS: i64 = 240;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A contract month parsed out of a structure identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractMonth {
    /// 1-based calendar month.
    pub month: u32,
    /// Full year (two-digit input mapped as `2000 + YY`).
    pub year: i32,
}

/// Scan `identifier` for the first `<Mon><YY>` substring (case-sensitive
/// 3-letter month immediately followed by two ASCII digits).
pub fn parse_contract_month(identifier: &str) -> Option<ContractMonth> {
    let bytes = identifier.as_bytes();
    if bytes.len() < 5 {
        return None;
    }
    for i in 0..=bytes.len() - 5 {
        let token = &bytes[i..i + 3];
        let Some(month_idx) = MONTHS.iter().position(|m| m.as_bytes() == token) else {
            continue;
        };
        let (d1, d2) = (bytes[i + 3], bytes[i + 4]);
        if d1.is_ascii_digit() && d2.is_ascii_digit() {
            let yy = (d1 - b'0') as i32 * 10 + (d2 - b'0') as i32;
            return Some(ContractMonth {
                month: month_idx as u32 + 1,
                year: 2000 + yy,
            });
        }
    }
    None
}

/// Derive the analysis window for a structure identifier.
///
/// Returns `None` when no contract-month pattern is present.
pub fn resolve_window(identifier: &str) -> Option<AnalysisWindow> {
    let contract = parse_contract_month(identifier)?;
    let end = last_day_of_month(contract.year, contract.month)?;
    let start = end.checked_sub_signed(Duration::days(LOOKBACK_DAYS))?;
    Some(AnalysisWindow { start, end })
}

/// Last calendar day of a month: first day of the next month minus one day,
/// with December wrapping to January of `year + 1`.
fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_space_separated_identifier() {
        let w = resolve_window("SR3-SR1 Jun25").unwrap();
        assert_eq!(w.end, ymd(2025, 6, 30));
        assert_eq!(w.end - w.start, Duration::days(240));
    }

    #[test]
    fn parses_concatenated_identifier() {
        let w = resolve_window("SR3-SR1Jun25").unwrap();
        assert_eq!(w.end, ymd(2025, 6, 30));
    }

    #[test]
    fn december_wraps_to_next_january() {
        let w = resolve_window("SR3-SR1 Dec24").unwrap();
        assert_eq!(w.end, ymd(2024, 12, 31));
        assert_eq!(w.start, ymd(2024, 12, 31) - Duration::days(240));
    }

    #[test]
    fn first_match_wins() {
        let m = parse_contract_month("Mar26 vs Jun25").unwrap();
        assert_eq!(m, ContractMonth { month: 3, year: 2026 });
    }

    #[test]
    fn month_must_be_capitalized() {
        assert!(parse_contract_month("sr3-sr1 jun25").is_none());
    }

    #[test]
    fn no_pattern_is_a_distinct_failure() {
        assert!(resolve_window("SR3-SR1 spread").is_none());
        assert!(resolve_window("").is_none());
        // Month token without a 2-digit year does not match.
        assert!(resolve_window("SR3-SR1 Jun").is_none());
        assert!(resolve_window("Jun2").is_none());
    }

    #[test]
    fn window_is_240_days_for_all_months() {
        for (idx, mon) in MONTHS.iter().enumerate() {
            let w = resolve_window(&format!("X {mon}24")).unwrap();
            assert_eq!(w.end - w.start, Duration::days(240), "month {}", idx + 1);
        }
    }

    #[test]
    fn multibyte_identifiers_do_not_panic() {
        assert!(parse_contract_month("spréad—é").is_none());
        let m = parse_contract_month("é Jun25").unwrap();
        assert_eq!(m.month, 6);
    }
}
