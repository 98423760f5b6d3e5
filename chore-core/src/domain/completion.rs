//! Completion and claim tracking.
//!
//! Answers "who has done what today": which completion records satisfy a
//! chore's occurrence on a day, whether a specific member has completed it,
//! and the per-member XP tally (earned vs possible) for a date. Up-for-grabs
//! chores credit whoever completed them; rotated chores credit only the
//! member the occurrence belongs to.

use chrono::NaiveDate;
use std::collections::HashMap;

use shared::XpSummary;

use crate::domain::calendar;
use crate::domain::commands::xp::{DailyXpQuery, XpRangeQuery, XpResult};
use crate::domain::models::{Chore, ChoreCompletion, MemberRef, RewardType};
use crate::domain::rotation::RotationService;

#[derive(Debug, Clone, Default)]
pub struct CompletionService {
    rotation: RotationService,
}

impl CompletionService {
    pub fn new() -> Self {
        Self {
            rotation: RotationService::new(),
        }
    }

    /// Completed records satisfying `chore`'s occurrence on `date`, in a
    /// deterministic order (by record id).
    pub fn completions_for_date<'a>(
        &self,
        completions: &'a [ChoreCompletion],
        chore: &Chore,
        date: NaiveDate,
    ) -> Vec<&'a ChoreCompletion> {
        let mut matching: Vec<&ChoreCompletion> = completions
            .iter()
            .filter(|completion| completion.chore_id == chore.id)
            .filter(|completion| completion.completed)
            .filter(|completion| calendar::matches_day(&completion.due_date, date))
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        matching
    }

    /// The member's own completed record for the occurrence, if any.
    pub fn member_completion_for_date<'a>(
        &self,
        completions: &'a [ChoreCompletion],
        chore: &Chore,
        member_id: &str,
        date: NaiveDate,
    ) -> Option<&'a ChoreCompletion> {
        self.completions_for_date(completions, chore, date)
            .into_iter()
            .find(|completion| {
                completion
                    .completed_by
                    .as_ref()
                    .map_or(false, |by| by.id == member_id)
            })
    }

    /// Per-member XP tally for one date across a set of chores.
    ///
    /// Fixed-reward chores contribute money, never XP, and are skipped, as
    /// are chores with zero or non-finite weight. Negative weight is a
    /// penalty: it lands in `current` when the chore was completed but
    /// never inflates `possible`. Members supplied in `members` always
    /// appear in the result, even with an empty tally; assignees missing
    /// from the roster still accrue.
    pub fn daily_xp(
        &self,
        chores: &[Chore],
        completions: &[ChoreCompletion],
        members: &[MemberRef],
        date: NaiveDate,
    ) -> HashMap<String, XpSummary> {
        let mut tallies: HashMap<String, XpSummary> = members
            .iter()
            .map(|member| (member.id.clone(), XpSummary::default()))
            .collect();

        for chore in chores {
            if chore.reward_type == RewardType::Fixed {
                continue;
            }
            let weight = chore.weight;
            if weight == 0.0 || !weight.is_finite() {
                continue;
            }
            let assigned = self.rotation.assigned_members_for_date(chore, date);
            if assigned.is_empty() {
                continue;
            }

            if chore.is_up_for_grabs {
                let completers: Vec<&MemberRef> = self
                    .completions_for_date(completions, chore, date)
                    .into_iter()
                    .filter_map(|completion| completion.completed_by.as_ref())
                    .collect();
                if completers.is_empty() {
                    if weight > 0.0 {
                        for member in &assigned {
                            tallies.entry(member.id.clone()).or_default().possible += weight;
                        }
                    }
                } else {
                    for member in completers {
                        let tally = tallies.entry(member.id.clone()).or_default();
                        tally.current += weight;
                        if weight > 0.0 {
                            tally.possible += weight;
                        }
                    }
                }
            } else {
                for member in &assigned {
                    let tally = tallies.entry(member.id.clone()).or_default();
                    if weight > 0.0 {
                        tally.possible += weight;
                    }
                    if self
                        .member_completion_for_date(completions, chore, &member.id, date)
                        .is_some()
                    {
                        tally.current += weight;
                    }
                }
            }
        }

        tallies
    }

    /// `daily_xp` folded over `[range_start, range_end]`, both ends
    /// inclusive, for period summaries.
    pub fn xp_for_range(
        &self,
        chores: &[Chore],
        completions: &[ChoreCompletion],
        members: &[MemberRef],
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> HashMap<String, XpSummary> {
        let mut totals: HashMap<String, XpSummary> = members
            .iter()
            .map(|member| (member.id.clone(), XpSummary::default()))
            .collect();
        let mut current = range_start;
        while current <= range_end {
            for (member_id, day) in self.daily_xp(chores, completions, members, current) {
                let total = totals.entry(member_id).or_default();
                total.current += day.current;
                total.possible += day.possible;
            }
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        totals
    }

    /// Command-shaped entry point for one day's XP tally.
    pub fn query_daily_xp(
        &self,
        query: DailyXpQuery,
        chores: &[Chore],
        completions: &[ChoreCompletion],
        members: &[MemberRef],
    ) -> XpResult {
        XpResult {
            xp_by_member: self.daily_xp(chores, completions, members, query.date),
        }
    }

    /// Command-shaped entry point for a range XP tally.
    pub fn query_xp_range(
        &self,
        query: XpRangeQuery,
        chores: &[Chore],
        completions: &[ChoreCompletion],
        members: &[MemberRef],
    ) -> XpResult {
        XpResult {
            xp_by_member: self.xp_for_range(
                chores,
                completions,
                members,
                query.range_start,
                query.range_end,
            ),
        }
    }
}
