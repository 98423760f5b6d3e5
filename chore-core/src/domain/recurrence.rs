//! Recurrence rule parsing and occurrence resolution.
//!
//! Rules use the iCalendar recurrence grammar (`FREQ=WEEKLY;INTERVAL=2;
//! BYDAY=MO,WE`), anchored at a chore's start date. Resolution is a pure
//! per-day membership predicate walked across a date range, which keeps
//! month-end rollovers (no 31st in February, no Feb 29 off leap years)
//! correct with no special cases: a day the month lacks simply never
//! matches.
//!
//! A malformed rule never escapes as an error from the resolver entry
//! points. One corrupt rule must not take down the schedule view for every
//! chore, so it degrades to zero occurrences with a warning.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::Chore;

/// Recurrence frequency. Closed set; anything else is a parse error rather
/// than a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("rule has no FREQ component")]
    MissingFrequency,
    #[error("unsupported frequency: {0}")]
    UnsupportedFrequency(String),
    #[error("invalid INTERVAL: {0}")]
    InvalidInterval(String),
    #[error("invalid BYDAY entry: {0}")]
    InvalidByDay(String),
    #[error("invalid BYMONTHDAY entry: {0}")]
    InvalidByMonthDay(String),
    #[error("malformed component: {0}")]
    MalformedComponent(String),
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    /// Step between occurrences in units of `frequency`; always >= 1.
    pub interval: u32,
    /// Weekdays the rule fires on (weekly rules only). Empty means the
    /// start date's weekday.
    pub by_day: Vec<Weekday>,
    /// Days of month the rule fires on (monthly rules only), 1..=31. Empty
    /// means the start date's day of month.
    pub by_month_day: Vec<u32>,
}

impl RecurrenceRule {
    /// Parse an iCalendar-style rule string. Keys are case-insensitive and
    /// an optional `RRULE:` prefix is tolerated; unknown components are
    /// ignored.
    pub fn parse(input: &str) -> Result<Self, RuleParseError> {
        let mut body = input.trim();
        if let Some(prefix) = body.get(..6) {
            if prefix.eq_ignore_ascii_case("RRULE:") {
                body = &body[6..];
            }
        }

        let mut frequency = None;
        let mut interval = 1u32;
        let mut by_day = Vec::new();
        let mut by_month_day = Vec::new();

        for component in body.split(';') {
            if component.is_empty() {
                continue;
            }
            let (key, value) = component
                .split_once('=')
                .ok_or_else(|| RuleParseError::MalformedComponent(component.to_string()))?;
            match key.trim().to_ascii_uppercase().as_str() {
                "FREQ" => {
                    frequency = Some(match value.trim().to_ascii_uppercase().as_str() {
                        "DAILY" => Frequency::Daily,
                        "WEEKLY" => Frequency::Weekly,
                        "MONTHLY" => Frequency::Monthly,
                        "YEARLY" => Frequency::Yearly,
                        other => {
                            return Err(RuleParseError::UnsupportedFrequency(other.to_string()))
                        }
                    });
                }
                "INTERVAL" => {
                    interval = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n >= 1)
                        .ok_or_else(|| RuleParseError::InvalidInterval(value.to_string()))?;
                }
                "BYDAY" => {
                    for token in value.split(',') {
                        by_day.push(parse_weekday(token.trim())?);
                    }
                }
                "BYMONTHDAY" => {
                    for token in value.split(',') {
                        let day = token
                            .trim()
                            .parse::<u32>()
                            .ok()
                            .filter(|d| (1..=31).contains(d))
                            .ok_or_else(|| RuleParseError::InvalidByMonthDay(token.to_string()))?;
                        by_month_day.push(day);
                    }
                }
                // UNTIL, COUNT, WKST etc. are not used by chore schedules.
                _ => {}
            }
        }

        Ok(Self {
            frequency: frequency.ok_or(RuleParseError::MissingFrequency)?,
            interval,
            by_day,
            by_month_day,
        })
    }

    /// True when `date` is an occurrence of this rule anchored at `start`.
    pub fn matches(&self, start: NaiveDate, date: NaiveDate) -> bool {
        if date < start {
            return false;
        }
        let interval = i64::from(self.interval);
        match self.frequency {
            Frequency::Daily => (date - start).num_days() % interval == 0,
            Frequency::Weekly => {
                if self.by_day.is_empty() {
                    date.weekday() == start.weekday()
                        && ((date - start).num_days() / 7) % interval == 0
                } else {
                    self.by_day.contains(&date.weekday())
                        && (week_index(start, date) % interval) == 0
                }
            }
            Frequency::Monthly => {
                let day_matches = if self.by_month_day.is_empty() {
                    date.day() == start.day()
                } else {
                    self.by_month_day.contains(&date.day())
                };
                day_matches && (month_index(date) - month_index(start)) % interval == 0
            }
            Frequency::Yearly => {
                date.month() == start.month()
                    && date.day() == start.day()
                    && i64::from(date.year() - start.year()) % interval == 0
            }
        }
    }
}

fn parse_weekday(token: &str) -> Result<Weekday, RuleParseError> {
    match token.to_ascii_uppercase().as_str() {
        "MO" => Ok(Weekday::Mon),
        "TU" => Ok(Weekday::Tue),
        "WE" => Ok(Weekday::Wed),
        "TH" => Ok(Weekday::Thu),
        "FR" => Ok(Weekday::Fri),
        "SA" => Ok(Weekday::Sat),
        "SU" => Ok(Weekday::Sun),
        _ => Err(RuleParseError::InvalidByDay(token.to_string())),
    }
}

/// Whole weeks between the Monday of `start`'s week and `date` (WKST=MO).
/// The anchor week is week 0, so BYDAY days share the week's interval slot.
fn week_index(start: NaiveDate, date: NaiveDate) -> i64 {
    let anchor_monday = start - Duration::days(i64::from(start.weekday().num_days_from_monday()));
    (date - anchor_monday).num_days().div_euclid(7)
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Stateless occurrence resolver over recurrence rules.
#[derive(Debug, Clone, Default)]
pub struct RecurrenceService;

impl RecurrenceService {
    pub fn new() -> Self {
        Self
    }

    /// All occurrence days of `rule` (anchored at `start_date`) within
    /// `[range_start, range_end]`, both ends inclusive, in ascending order.
    ///
    /// A `None` or empty rule means the chore occurs exactly once, on its
    /// start date. A malformed rule yields no occurrences.
    pub fn occurrences_between(
        &self,
        rule: Option<&str>,
        start_date: NaiveDate,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Vec<NaiveDate> {
        let raw = match rule.map(str::trim).filter(|r| !r.is_empty()) {
            Some(raw) => raw,
            None => {
                if start_date >= range_start && start_date <= range_end {
                    return vec![start_date];
                }
                return Vec::new();
            }
        };

        let parsed = match RecurrenceRule::parse(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("ignoring malformed recurrence rule {:?}: {}", raw, err);
                return Vec::new();
            }
        };

        let mut occurrences = Vec::new();
        let mut current = range_start.max(start_date);
        while current <= range_end {
            if parsed.matches(start_date, current) {
                occurrences.push(current);
            }
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        occurrences
    }

    /// Occurrence membership for exactly one day.
    pub fn is_occurrence(&self, rule: Option<&str>, start_date: NaiveDate, date: NaiveDate) -> bool {
        match rule.map(str::trim).filter(|r| !r.is_empty()) {
            None => date == start_date,
            Some(raw) => match RecurrenceRule::parse(raw) {
                Ok(parsed) => parsed.matches(start_date, date),
                Err(err) => {
                    warn!("ignoring malformed recurrence rule {:?}: {}", raw, err);
                    false
                }
            },
        }
    }

    /// Gate before any assignment or claim logic runs for a chore on a day.
    pub fn is_due_on_date(&self, chore: &Chore, date: NaiveDate) -> bool {
        self.is_occurrence(chore.recurrence_rule.as_deref(), chore.start_date, date)
    }

    /// Number of occurrences strictly after `start_date` up to and
    /// including `date`. This is the boundary count rotation indexing needs
    /// for interval-stepped schedules.
    pub fn occurrences_since_start(
        &self,
        rule: Option<&str>,
        start_date: NaiveDate,
        date: NaiveDate,
    ) -> u32 {
        if date <= start_date {
            return 0;
        }
        let from = match start_date.succ_opt() {
            Some(from) => from,
            None => return 0,
        };
        self.occurrences_between(rule, start_date, from, date).len() as u32
    }
}
