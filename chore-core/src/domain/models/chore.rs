use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::member::MemberRef;

/// How the single on-duty assignee is rotated across occurrences.
///
/// Stored upstream as a free-form string; anything unrecognized parses to
/// `Unknown` so a legacy value degrades to "no rotation" instead of
/// crashing a schedule view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    #[serde(other)]
    Unknown,
}

impl RotationType {
    /// Parse from the stored string form.
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" | "" => RotationType::None,
            "daily" => RotationType::Daily,
            "weekly" => RotationType::Weekly,
            "monthly" => RotationType::Monthly,
            _ => RotationType::Unknown,
        }
    }
}

/// How completing the chore pays out: weighted XP feeding the proportional
/// allowance split, or a flat per-completion amount in a fixed currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    #[default]
    Weight,
    Fixed,
    #[serde(other)]
    Unknown,
}

impl RewardType {
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "weight" | "" => RewardType::Weight,
            "fixed" => RewardType::Fixed,
            _ => RewardType::Unknown,
        }
    }
}

/// One slot in a chore's rotation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreAssignment {
    pub member: MemberRef,
    /// Position in the rotation; the rotation index is taken modulo the
    /// number of assignments after sorting by this value.
    pub order: i32,
}

/// A recurring or one-time obligation on the family calendar.
///
/// `start_date` anchors all recurrence math and is immutable after
/// creation. A `None` recurrence rule means the chore occurs exactly once,
/// on the start date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: String,
    pub title: String,
    pub start_date: NaiveDate,
    /// iCalendar-style rule (`FREQ=WEEKLY;INTERVAL=2;...`), or `None` for a
    /// one-shot chore.
    #[serde(default)]
    pub recurrence_rule: Option<String>,
    /// Signed XP weight. Negative weight is a penalty: it counts toward
    /// earned XP when completed but never toward possible XP.
    pub weight: f64,
    #[serde(default)]
    pub reward_type: RewardType,
    #[serde(default)]
    pub fixed_reward_amount: f64,
    #[serde(default)]
    pub fixed_reward_currency: String,
    #[serde(default)]
    pub rotation_type: RotationType,
    /// Anyone assigned may claim the occurrence; the first completer wins
    /// the credit.
    #[serde(default)]
    pub is_up_for_grabs: bool,
    /// Informational only: the chore is meant to be done together.
    #[serde(default)]
    pub is_joint: bool,
    /// Everyone who can ever be assigned this chore.
    #[serde(default)]
    pub assignees: Vec<MemberRef>,
    /// Ordered rotation slots; consulted only when `rotation_type` is not
    /// `None`.
    #[serde(default)]
    pub assignments: Vec<ChoreAssignment>,
}

impl Chore {
    /// Generate a unique id for a chore.
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("chore::{}", timestamp_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_type_from_string() {
        assert_eq!(RotationType::from_string("none"), RotationType::None);
        assert_eq!(RotationType::from_string(""), RotationType::None);
        assert_eq!(RotationType::from_string("Daily"), RotationType::Daily);
        assert_eq!(RotationType::from_string("WEEKLY"), RotationType::Weekly);
        assert_eq!(RotationType::from_string("monthly"), RotationType::Monthly);
        assert_eq!(RotationType::from_string("fortnightly"), RotationType::Unknown);
    }

    #[test]
    fn test_reward_type_from_string() {
        assert_eq!(RewardType::from_string("weight"), RewardType::Weight);
        assert_eq!(RewardType::from_string(""), RewardType::Weight);
        assert_eq!(RewardType::from_string("Fixed"), RewardType::Fixed);
        assert_eq!(RewardType::from_string("points"), RewardType::Unknown);
    }

    #[test]
    fn test_unknown_rotation_type_deserializes() {
        let rotation: RotationType = serde_json::from_str(r#""fortnightly""#).unwrap();
        assert_eq!(rotation, RotationType::Unknown);
    }

    #[test]
    fn test_generate_id() {
        assert_eq!(Chore::generate_id(1234567890), "chore::1234567890");
    }
}
