//! Lenient numeric coercion and strict date parsing.
//!
//! | field kind | empty | unparsable | negative | fractional | NaN / inf |
//! |------------|-------|------------|----------|------------|-----------|
//! | count      | 0     | 0          | 0        | rounded    | 0         |
//! | amount     | 0.0   | 0.0        | 0.0      | kept       | 0.0       |
//!
//! Counts above `u64::MAX` clamp to `u64::MAX`, and summed counts saturate there.

use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionOutcome {
    Parsed,
    Empty,
    Unparsable,
    Negative,
    NonFinite,
    Rounded,
}

impl CoercionOutcome {
    /// True when the raw text was not taken at face value.
    pub fn is_fallback(self) -> bool {
        !matches!(self, CoercionOutcome::Parsed | CoercionOutcome::Rounded)
    }
}

pub fn coerce_amount_with_outcome(raw: &str) -> (f64, CoercionOutcome) {
    let text = raw.trim();
    if text.is_empty() {
        return (0.0, CoercionOutcome::Empty);
    }
    match text.parse::<f64>() {
        Err(_) => (0.0, CoercionOutcome::Unparsable),
        Ok(v) if !v.is_finite() => (0.0, CoercionOutcome::NonFinite),
        Ok(v) if v < 0.0 => (0.0, CoercionOutcome::Negative),
        // normalises -0.0
        Ok(v) => (v + 0.0, CoercionOutcome::Parsed),
    }
}

pub fn coerce_count_with_outcome(raw: &str) -> (u64, CoercionOutcome) {
    let (value, outcome) = coerce_amount_with_outcome(raw);
    if outcome != CoercionOutcome::Parsed {
        return (0, outcome);
    }
    let rounded = value.round();
    let outcome = if rounded == value {
        CoercionOutcome::Parsed
    } else {
        CoercionOutcome::Rounded
    };
    (rounded as u64, outcome)
}

pub fn coerce_amount(raw: &str) -> f64 {
    coerce_amount_with_outcome(raw).0
}

pub fn coerce_count(raw: &str) -> u64 {
    coerce_count_with_outcome(raw).0
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Calendar date from the accepted date or date-time forms. Time of day is discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}
