//! Rotation preview grids for calendar rendering.
//!
//! Produces a day-keyed map of per-member assignment/completion state over
//! an arbitrary range so the view layer can paint a rotation calendar
//! without re-deriving any scheduling logic. For chores with rotation data
//! the preview shows the rotated on-duty member even when the chore is up
//! for grabs: who *may act* is everyone, but the preview exists to make the
//! rotation order visible.

use chrono::NaiveDate;
use std::collections::HashMap;

use shared::{MemberDayState, RotationPreview};

use crate::domain::calendar;
use crate::domain::completion::CompletionService;
use crate::domain::models::{Chore, ChoreCompletion, RotationType};
use crate::domain::recurrence::RecurrenceService;
use crate::domain::rotation::RotationService;

#[derive(Debug, Clone, Default)]
pub struct PreviewService {
    resolver: RecurrenceService,
    rotation: RotationService,
    completion: CompletionService,
}

impl PreviewService {
    pub fn new() -> Self {
        Self {
            resolver: RecurrenceService::new(),
            rotation: RotationService::new(),
            completion: CompletionService::new(),
        }
    }

    /// Preview of one chore over `[range_start, range_end)`.
    ///
    /// Every day in the range gets an entry; days where the chore is not
    /// due carry an empty member map so the grid can still render the cell.
    pub fn rotation_preview(
        &self,
        chore: &Chore,
        completions: &[ChoreCompletion],
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> RotationPreview {
        let mut preview = RotationPreview::new();
        let mut current = range_start;
        while current < range_end {
            preview.insert(calendar::day_key(current), self.day_states(chore, completions, current));
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        preview
    }

    fn day_states(
        &self,
        chore: &Chore,
        completions: &[ChoreCompletion],
        date: NaiveDate,
    ) -> HashMap<String, MemberDayState> {
        let mut states: HashMap<String, MemberDayState> = HashMap::new();
        if !self.resolver.is_due_on_date(chore, date) {
            return states;
        }

        let rotation_active = !matches!(
            chore.rotation_type,
            RotationType::None | RotationType::Unknown
        );
        if rotation_active && !chore.assignments.is_empty() {
            if let Some(member) = self.rotation.assignee_for_occurrence(chore, date) {
                states.entry(member.id).or_default().assigned = true;
            }
        } else {
            for member in &chore.assignees {
                states.entry(member.id.clone()).or_default().assigned = true;
            }
        }

        for record in self.completion.completions_for_date(completions, chore, date) {
            if let Some(by) = &record.completed_by {
                states.entry(by.id.clone()).or_default().completed = true;
            }
        }
        states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ChoreAssignment, MemberRef, RewardType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn member(id: &str) -> MemberRef {
        MemberRef::new(id)
    }

    fn rotated_chore() -> Chore {
        Chore {
            id: "chore::1".to_string(),
            title: "Trash".to_string(),
            start_date: date(2026, 3, 1),
            recurrence_rule: Some("FREQ=DAILY".to_string()),
            weight: 1.0,
            reward_type: RewardType::Weight,
            fixed_reward_amount: 0.0,
            fixed_reward_currency: String::new(),
            rotation_type: RotationType::Daily,
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

    #[test]
    fn test_preview_has_one_entry_per_day() {
        let service = PreviewService::new();
        let chore = rotated_chore();
        let preview = service.rotation_preview(&chore, &[], date(2026, 3, 1), date(2026, 3, 8));
        assert_eq!(preview.len(), 7);
        assert!(preview.contains_key("2026-03-01"));
        assert!(preview.contains_key("2026-03-07"));
        assert!(!preview.contains_key("2026-03-08"));
    }

    #[test]
    fn test_preview_shows_rotated_member_per_day() {
        let service = PreviewService::new();
        let chore = rotated_chore();
        let preview = service.rotation_preview(&chore, &[], date(2026, 3, 1), date(2026, 3, 3));

        let day_one = &preview["2026-03-01"];
        assert!(day_one["alex"].assigned);
        assert!(!day_one.contains_key("blair"));

        let day_two = &preview["2026-03-02"];
        assert!(day_two["blair"].assigned);
        assert!(!day_two.contains_key("alex"));
    }

    #[test]
    fn test_preview_consults_rotation_even_when_up_for_grabs() {
        let service = PreviewService::new();
        let mut chore = rotated_chore();
        chore.is_up_for_grabs = true;
        let preview = service.rotation_preview(&chore, &[], date(2026, 3, 1), date(2026, 3, 2));
        // Anyone may act, but the preview still paints the rotation order.
        assert!(preview["2026-03-01"]["alex"].assigned);
        assert!(!preview["2026-03-01"].contains_key("blair"));
    }

    #[test]
    fn test_preview_marks_completions_even_off_rotation() {
        let service = PreviewService::new();
        let chore = rotated_chore();
        // Blair covered for Alex on Alex's day.
        let records = vec![ChoreCompletion {
            id: "done-1".to_string(),
            chore_id: "chore::1".to_string(),
            due_date: "2026-03-01".to_string(),
            completed: true,
            completed_by: Some(member("blair")),
            awarded: false,
        }];
        let preview = service.rotation_preview(&chore, &records, date(2026, 3, 1), date(2026, 3, 2));

        let day = &preview["2026-03-01"];
        assert!(day["alex"].assigned);
        assert!(!day["alex"].completed);
        assert!(day["blair"].completed);
        assert!(!day["blair"].assigned);
    }

    #[test]
    fn test_undue_days_carry_empty_maps() {
        let service = PreviewService::new();
        let mut chore = rotated_chore();
        chore.recurrence_rule = Some("FREQ=WEEKLY".to_string());
        chore.start_date = date(2026, 3, 2); // Monday
        let preview = service.rotation_preview(&chore, &[], date(2026, 3, 2), date(2026, 3, 9));

        assert!(!preview["2026-03-02"].is_empty());
        assert!(preview["2026-03-03"].is_empty());
        assert!(preview["2026-03-08"].is_empty());
        assert_eq!(preview.len(), 7);
    }
}
