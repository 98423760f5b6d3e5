//! Calendar-day normalization for the chore engine.
//!
//! Every comparison in the engine happens on UTC calendar days so that a
//! schedule viewed from any timezone agrees on which occurrences belong to
//! "today". This module is the single place date-like input is converted
//! to a `NaiveDate` and back to the `YYYY-MM-DD` day keys that cross the
//! crate boundary.

use chrono::{DateTime, NaiveDate, Utc};

/// Format a UTC calendar day as a `YYYY-MM-DD` day key.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse any supported date-like input into a UTC calendar day.
///
/// Accepts a bare day key (`2026-03-01`) or an RFC 3339 instant
/// (`2026-03-01T23:30:00-05:00`, which normalizes to `2026-03-02` in UTC).
/// Anything else yields `None`.
pub fn parse_day_key(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|instant| instant.with_timezone(&Utc).date_naive())
}

/// Strip the time-of-day from an explicit UTC instant.
pub fn normalize_instant(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// True when `candidate` identifies the same UTC calendar day as `date`.
pub fn matches_day(candidate: &str, date: NaiveDate) -> bool {
    parse_day_key(candidate) == Some(date)
}
