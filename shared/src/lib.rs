use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-member XP tally for a single day or an aggregated range.
///
/// `current` is the weight actually earned through completions; `possible`
/// is the weight that was available to earn. Negative-weight chores add to
/// `current` when completed but never to `possible`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct XpSummary {
    pub current: f64,
    pub possible: f64,
}

/// Assignment/completion state of one member on one calendar day, used by
/// rotation-preview calendar grids so the view layer never re-derives
/// scheduling logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MemberDayState {
    /// The member is assigned (or may claim) the chore on this day.
    pub assigned: bool,
    /// The member has a completed record for this day's occurrence.
    pub completed: bool,
}

/// Day-keyed rotation preview over a date range. Keys are `YYYY-MM-DD` day
/// keys in UTC; days where the chore is not due carry an empty member map.
pub type RotationPreview = BTreeMap<String, HashMap<String, MemberDayState>>;

/// Result of settling one allowance period for one member.
///
/// Produced fresh on demand; the external ledger is responsible for turning
/// `calculated_amount` and `fixed_rewards_earned` into balance mutations and
/// for persisting any copy of this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub member_id: String,
    /// Start of the settled period (inclusive), `YYYY-MM-DD`.
    pub period_start: String,
    /// End of the settled period (exclusive), `YYYY-MM-DD`.
    pub period_end: String,
    /// Sum of weights of every weighted occurrence assigned to the member.
    pub total_weight: f64,
    /// Sum of weights of occurrences the member (or any claimer, for
    /// up-for-grabs chores) completed.
    pub completed_weight: f64,
    /// Proportional allowance amount: `completed / total * allowance total`,
    /// 0 when nothing was possible.
    pub calculated_amount: f64,
    /// `completed_weight / total_weight` as a percentage (0 when nothing
    /// was possible).
    pub percentage: f64,
    /// Slice of `percentage` attributable to up-for-grabs chores.
    pub up_for_grabs_contribution_percentage: f64,
    /// Flat fixed-reward totals keyed by uppercased currency code. Settled
    /// separately from the proportional amount.
    pub fixed_rewards_earned: BTreeMap<String, f64>,
    /// Ids of the completion records folded into this settlement. The caller
    /// must mark these awarded exactly once after committing to the ledger.
    pub completions_to_mark: Vec<String>,
    /// Instant the settlement was computed, supplied by the caller.
    pub last_calculated_at: DateTime<Utc>,
}
