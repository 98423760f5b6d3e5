use chrono::NaiveDate;
use std::collections::HashMap;

use shared::XpSummary;

/// Request for the per-member XP tally of a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyXpQuery {
    pub date: NaiveDate,
}

/// Request for the accumulated XP tally over `[range_start, range_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpRangeQuery {
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XpResult {
    pub xp_by_member: HashMap<String, XpSummary>,
}
