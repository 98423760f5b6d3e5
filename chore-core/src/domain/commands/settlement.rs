use chrono::{DateTime, NaiveDate, Utc};

use shared::Settlement;

/// Request to settle one allowance period for one member.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlePeriodCommand {
    pub member_id: String,
    /// Start of the period, inclusive.
    pub period_start: NaiveDate,
    /// End of the period, exclusive.
    pub period_end: NaiveDate,
    /// The full allowance amount the period's weight ratio is applied to.
    pub total_allowance_amount: f64,
    /// The caller's "current instant"; the engine never reads a clock.
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettlePeriodResult {
    /// `None` when the member has no qualifying occurrence in the period
    /// at all; a legitimate zero result is still `Some`.
    pub settlement: Option<Settlement>,
}
