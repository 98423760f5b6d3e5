//! Rotation assignment indexing.
//!
//! Turns a chore's rotation policy into "who is on duty" for a given
//! occurrence. The subtle case is an interval-stepped schedule (every 2
//! weeks, every 3 months): there the index must count actual occurrence
//! boundaries crossed since the start date, not raw elapsed time, or a
//! skip-a-week rotation drifts past the roster.

use chrono::{Datelike, NaiveDate};
use log::warn;

use crate::domain::models::{Chore, ChoreAssignment, MemberRef, RotationType};
use crate::domain::recurrence::{Frequency, RecurrenceRule, RecurrenceService};

#[derive(Debug, Clone, Default)]
pub struct RotationService {
    resolver: RecurrenceService,
}

impl RotationService {
    pub fn new() -> Self {
        Self {
            resolver: RecurrenceService::new(),
        }
    }

    /// Zero-based rotation counter for a chore on an occurrence date.
    ///
    /// For schedules whose rule steps the rotation's own unit with an
    /// interval above one, the counter is the number of occurrence
    /// boundaries crossed since the start date (a query between boundaries
    /// keeps the index of the last boundary). Otherwise the closed forms
    /// apply: elapsed days, elapsed whole weeks, or elapsed month
    /// boundaries, all floored at zero.
    pub fn rotation_index(&self, chore: &Chore, occurrence_date: NaiveDate) -> u32 {
        let start = chore.start_date;
        if occurrence_date <= start {
            return 0;
        }

        if let Some(stepped) = self.stepped_index(chore, occurrence_date) {
            return stepped;
        }

        let elapsed_days = (occurrence_date - start).num_days().max(0);
        match chore.rotation_type {
            RotationType::None | RotationType::Unknown => 0,
            RotationType::Daily => elapsed_days as u32,
            RotationType::Weekly => (elapsed_days / 7) as u32,
            RotationType::Monthly => {
                let months = month_index(occurrence_date) - month_index(start);
                months.max(0) as u32
            }
        }
    }

    /// Occurrence-boundary counting for interval-stepped schedules. `None`
    /// when the chore has no parsed rule stepping the rotation's unit, or
    /// the interval is 1 (where the closed forms agree anyway).
    fn stepped_index(&self, chore: &Chore, occurrence_date: NaiveDate) -> Option<u32> {
        let raw = chore.recurrence_rule.as_deref()?;
        let rule = RecurrenceRule::parse(raw).ok()?;
        if rule.interval <= 1 {
            return None;
        }
        let unit_matches = matches!(
            (chore.rotation_type, rule.frequency),
            (RotationType::Daily, Frequency::Daily)
                | (RotationType::Weekly, Frequency::Weekly)
                | (RotationType::Monthly, Frequency::Monthly)
        );
        if !unit_matches {
            return None;
        }
        Some(
            self.resolver
                .occurrences_since_start(Some(raw), chore.start_date, occurrence_date),
        )
    }

    /// The single rotated assignee for an occurrence, or `None` when the
    /// chore carries no assignment data. An empty roster is "unassigned",
    /// never an error; the UI surfaces it as an actionable warning.
    pub fn assignee_for_occurrence(&self, chore: &Chore, date: NaiveDate) -> Option<MemberRef> {
        if chore.assignments.is_empty() {
            return None;
        }
        let mut ordered: Vec<&ChoreAssignment> = chore.assignments.iter().collect();
        ordered.sort_by_key(|assignment| assignment.order);
        let index = self.rotation_index(chore, date) as usize % ordered.len();
        Some(ordered[index].member.clone())
    }

    /// Everyone assigned to a chore on a date. Empty when the chore is not
    /// due. Up-for-grabs chores and chores without rotation (or without
    /// rotation data) assign the full static roster; otherwise exactly the
    /// rotated member.
    pub fn assigned_members_for_date(&self, chore: &Chore, date: NaiveDate) -> Vec<MemberRef> {
        if !self.resolver.is_due_on_date(chore, date) {
            return Vec::new();
        }
        let rotation_active = !matches!(
            chore.rotation_type,
            RotationType::None | RotationType::Unknown
        );
        if rotation_active && !chore.is_up_for_grabs && chore.assignments.is_empty() {
            warn!(
                "Chore {} rotates {:?} but has no assignment order; treating as unrotated",
                chore.id, chore.rotation_type
            );
        }
        if chore.is_up_for_grabs || !rotation_active || chore.assignments.is_empty() {
            return chore.assignees.clone();
        }
        self.assignee_for_occurrence(chore, date)
            .map(|member| vec![member])
            .unwrap_or_default()
    }
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RewardType;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn member(id: &str) -> MemberRef {
        MemberRef::new(id)
    }

    fn rotating_chore(rule: &str, rotation: RotationType, start: NaiveDate) -> Chore {
        Chore {
            id: "chore::1".to_string(),
            title: "Dishes".to_string(),
            start_date: start,
            recurrence_rule: Some(rule.to_string()),
            weight: 2.0,
            reward_type: RewardType::Weight,
            fixed_reward_amount: 0.0,
            fixed_reward_currency: String::new(),
            rotation_type: rotation,
            is_up_for_grabs: false,
            is_joint: false,
            assignees: vec![member("alex"), member("blair")],
            assignments: vec![
                ChoreAssignment {
                    member: member("alex"),
                    order: 0,
                },
                ChoreAssignment {
                    member: member("blair"),
                    order: 1,
                },
            ],
        }
    }

    fn self_index(chore: &Chore, date: NaiveDate) -> u32 {
        RotationService::new().rotation_index(chore, date)
    }

    #[test]
    fn test_no_rotation_always_index_zero() {
        let chore = rotating_chore("FREQ=DAILY", RotationType::None, date(2026, 3, 1));
        assert_eq!(self_index(&chore, date(2026, 3, 25)), 0);
    }

    #[test]
    fn test_daily_rotation_alternates_members() {
        let service = RotationService::new();
        let chore = rotating_chore("FREQ=DAILY", RotationType::Daily, date(2026, 3, 1));

        let on = |d: NaiveDate| {
            service
                .assigned_members_for_date(&chore, d)
                .into_iter()
                .map(|m| m.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(on(date(2026, 3, 1)), vec!["alex"]);
        assert_eq!(on(date(2026, 3, 2)), vec!["blair"]);
        assert_eq!(on(date(2026, 3, 3)), vec!["alex"]);
    }

    #[test]
    fn test_index_floors_at_zero_before_start() {
        let chore = rotating_chore("FREQ=DAILY", RotationType::Daily, date(2026, 3, 10));
        assert_eq!(self_index(&chore, date(2026, 3, 1)), 0);
        assert_eq!(self_index(&chore, date(2026, 3, 10)), 0);
    }

    #[test]
    fn test_weekly_rotation_without_stepping() {
        let chore = rotating_chore("FREQ=WEEKLY", RotationType::Weekly, date(2026, 3, 2));
        assert_eq!(self_index(&chore, date(2026, 3, 2)), 0);
        assert_eq!(self_index(&chore, date(2026, 3, 9)), 1);
        assert_eq!(self_index(&chore, date(2026, 3, 16)), 2);
    }

    #[test]
    fn test_interval_stepped_weekly_counts_boundaries_not_weeks() {
        // Every 2 weeks anchored on a Monday: day 0 is index 0; sixteen
        // days later only one boundary (day 14) has been crossed.
        let chore = rotating_chore(
            "FREQ=WEEKLY;INTERVAL=2",
            RotationType::Weekly,
            date(2026, 3, 2),
        );
        assert_eq!(self_index(&chore, date(2026, 3, 2)), 0);
        assert_eq!(self_index(&chore, date(2026, 3, 16)), 1);
        assert_eq!(self_index(&chore, date(2026, 3, 18)), 1);
        assert_eq!(self_index(&chore, date(2026, 3, 30)), 2);
    }

    #[test]
    fn test_interval_stepped_monthly_counts_occurrences_only() {
        // Every 2 months anchored on the 31st: only months that actually
        // carry an occurrence advance the index.
        let chore = rotating_chore(
            "FREQ=MONTHLY;INTERVAL=2",
            RotationType::Monthly,
            date(2026, 1, 31),
        );
        assert_eq!(self_index(&chore, date(2026, 1, 31)), 0);
        assert_eq!(self_index(&chore, date(2026, 3, 31)), 1);
        assert_eq!(self_index(&chore, date(2026, 5, 31)), 2);
    }

    #[test]
    fn test_monthly_rotation_counts_month_boundaries() {
        let chore = rotating_chore("FREQ=MONTHLY", RotationType::Monthly, date(2026, 1, 15));
        assert_eq!(self_index(&chore, date(2026, 1, 20)), 0);
        assert_eq!(self_index(&chore, date(2026, 2, 15)), 1);
        assert_eq!(self_index(&chore, date(2026, 4, 15)), 3);
    }

    #[test]
    fn test_assignee_for_occurrence_respects_order_not_list_position() {
        let service = RotationService::new();
        let mut chore = rotating_chore("FREQ=DAILY", RotationType::Daily, date(2026, 3, 1));
        // Same members, reversed list order but explicit `order` wins.
        chore.assignments = vec![
            ChoreAssignment {
                member: member("blair"),
                order: 1,
            },
            ChoreAssignment {
                member: member("alex"),
                order: 0,
            },
        ];
        let first = service
            .assignee_for_occurrence(&chore, date(2026, 3, 1))
            .unwrap();
        assert_eq!(first.id, "alex");
    }

    #[test]
    fn test_empty_assignments_is_unassigned_not_error() {
        let service = RotationService::new();
        let mut chore = rotating_chore("FREQ=DAILY", RotationType::Daily, date(2026, 3, 1));
        chore.assignments.clear();
        assert!(service
            .assignee_for_occurrence(&chore, date(2026, 3, 1))
            .is_none());
        // Falls back to the full static roster for assignment display.
        let assigned = service.assigned_members_for_date(&chore, date(2026, 3, 1));
        assert_eq!(assigned.len(), 2);
    }

    #[test]
    fn test_up_for_grabs_returns_full_roster_despite_rotation() {
        let service = RotationService::new();
        let mut chore = rotating_chore("FREQ=DAILY", RotationType::Daily, date(2026, 3, 1));
        chore.is_up_for_grabs = true;
        let assigned = service.assigned_members_for_date(&chore, date(2026, 3, 2));
        let ids: Vec<_> = assigned.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["alex", "blair"]);
    }

    #[test]
    fn test_not_due_means_nobody_assigned() {
        let service = RotationService::new();
        let chore = rotating_chore("FREQ=WEEKLY", RotationType::Weekly, date(2026, 3, 2));
        // Tuesday is not an occurrence of a Monday-anchored weekly rule.
        assert!(service
            .assigned_members_for_date(&chore, date(2026, 3, 3))
            .is_empty());
    }

    #[test]
    fn test_non_recurring_chore_assigned_only_on_start_date() {
        let service = RotationService::new();
        let mut chore = rotating_chore("FREQ=DAILY", RotationType::None, date(2026, 3, 5));
        chore.recurrence_rule = None;
        assert_eq!(
            service.assigned_members_for_date(&chore, date(2026, 3, 5)).len(),
            2
        );
        assert!(service
            .assigned_members_for_date(&chore, date(2026, 3, 4))
            .is_empty());
        assert!(service
            .assigned_members_for_date(&chore, date(2026, 3, 6))
            .is_empty());
    }

    proptest! {
        /// For stepped weekly schedules the index advances by exactly one
        /// per interval-sized boundary, regardless of where in the gap the
        /// query lands.
        #[test]
        fn prop_weekly_stepped_index_advances_per_boundary(
            interval in 1u32..=4,
            offset_days in 0i64..120,
        ) {
            let start = date(2026, 3, 2); // Monday
            let rule = format!("FREQ=WEEKLY;INTERVAL={}", interval);
            let chore = rotating_chore(&rule, RotationType::Weekly, start);
            let target = start + chrono::Duration::days(offset_days);
            let expected = (offset_days / (7 * i64::from(interval))) as u32;
            prop_assert_eq!(self_index(&chore, target), expected);
        }

        /// Monthly stepping anchored on a safe day of month (1..=28) never
        /// skips, so the index is the elapsed stepped-month count.
        #[test]
        fn prop_monthly_stepped_index_advances_per_boundary(
            interval in 1u32..=4,
            months_ahead in 0i64..24,
        ) {
            let start = date(2026, 1, 15);
            let rule = format!("FREQ=MONTHLY;INTERVAL={}", interval);
            let chore = rotating_chore(&rule, RotationType::Monthly, start);
            let target = NaiveDate::from_ymd_opt(
                2026 + (months_ahead / 12) as i32,
                (months_ahead % 12) as u32 + 1,
                15,
            ).unwrap();
            let expected = (months_ahead / i64::from(interval)) as u32;
            prop_assert_eq!(self_index(&chore, target), expected);
        }
    }
}
