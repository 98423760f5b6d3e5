//! Allowance period settlement.
//!
//! Aggregates the same per-date resolver/rotation decisions used by the
//! daily views across a whole allowance period and turns them into a
//! ledger-ready amount: completed weight over possible weight, applied
//! proportionally to the period's allowance total, with fixed-reward
//! chores settling separately as flat per-currency amounts.
//!
//! Only completions not yet marked `awarded` are counted, and the caller
//! marks the returned completion ids awarded exactly once after the
//! ledger write. A crash between compute and mark therefore converges on
//! the next run instead of double-paying.

use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info};
use std::collections::{BTreeMap, HashSet};

use shared::Settlement;

use crate::domain::calendar;
use crate::domain::commands::settlement::{SettlePeriodCommand, SettlePeriodResult};
use crate::domain::completion::CompletionService;
use crate::domain::models::{Chore, ChoreCompletion, RewardType};
use crate::domain::recurrence::RecurrenceService;
use crate::domain::rotation::RotationService;

#[derive(Debug, Clone, Default)]
pub struct SettlementService {
    resolver: RecurrenceService,
    rotation: RotationService,
    completion: CompletionService,
}

impl SettlementService {
    pub fn new() -> Self {
        Self {
            resolver: RecurrenceService::new(),
            rotation: RotationService::new(),
            completion: CompletionService::new(),
        }
    }

    /// Settle `[period_start, period_end)` for one member.
    ///
    /// The caller must supply a consistent snapshot of chores and
    /// completions; nothing here re-reads state or the clock. Returns
    /// `Ok(SettlePeriodResult { settlement: None })` when the member has no
    /// qualifying occurrence in the period at all.
    pub fn settle_period(
        &self,
        command: SettlePeriodCommand,
        chores: &[Chore],
        completions: &[ChoreCompletion],
    ) -> Result<SettlePeriodResult> {
        info!(
            "Settling period {}..{} for member {}",
            command.period_start, command.period_end, command.member_id
        );

        if command.member_id.trim().is_empty() {
            return Err(anyhow::anyhow!("Member id cannot be empty"));
        }
        if command.period_end <= command.period_start {
            return Err(anyhow::anyhow!(
                "Period end {} must be after period start {}",
                command.period_end,
                command.period_start
            ));
        }
        if command.total_allowance_amount < 0.0 {
            return Err(anyhow::anyhow!("Allowance amount cannot be negative"));
        }
        if command.total_allowance_amount > 1_000_000.0 {
            return Err(anyhow::anyhow!("Allowance amount is too large"));
        }

        // The resolver range is inclusive; the period end is exclusive.
        let last_day = match command.period_end.pred_opt() {
            Some(day) => day,
            None => return Err(anyhow::anyhow!("Period end is out of calendar range")),
        };

        let mut total_weight = 0.0;
        let mut completed_weight = 0.0;
        let mut up_for_grabs_completed_weight = 0.0;
        let mut fixed_rewards_earned: BTreeMap<String, f64> = BTreeMap::new();
        let mut completions_to_mark = Vec::new();
        let mut any_occurrence = false;

        for chore in chores {
            let occurrences = self.resolver.occurrences_between(
                chore.recurrence_rule.as_deref(),
                chore.start_date,
                command.period_start,
                last_day,
            );

            for occurrence in occurrences {
                let assigned = self.rotation.assigned_members_for_date(chore, occurrence);
                if !assigned.iter().any(|m| m.id == command.member_id) {
                    continue;
                }
                any_occurrence = true;

                let weighted = chore.reward_type != RewardType::Fixed;
                if weighted && chore.weight.is_finite() {
                    total_weight += chore.weight;
                }

                let qualifying = if chore.is_up_for_grabs {
                    self.completion
                        .completions_for_date(completions, chore, occurrence)
                        .into_iter()
                        .find(|record| !record.awarded)
                } else {
                    self.completion
                        .member_completion_for_date(
                            completions,
                            chore,
                            &command.member_id,
                            occurrence,
                        )
                        .filter(|record| !record.awarded)
                };

                let record = match qualifying {
                    Some(record) => record,
                    None => continue,
                };

                if weighted && chore.weight.is_finite() {
                    completed_weight += chore.weight;
                    if chore.is_up_for_grabs {
                        up_for_grabs_completed_weight += chore.weight;
                    }
                } else if chore.reward_type == RewardType::Fixed {
                    let currency = chore.fixed_reward_currency.to_uppercase();
                    *fixed_rewards_earned.entry(currency).or_insert(0.0) +=
                        chore.fixed_reward_amount;
                }
                completions_to_mark.push(record.id.clone());
            }
        }

        if !any_occurrence {
            debug!(
                "No qualifying occurrences for member {} in {}..{}",
                command.member_id, command.period_start, command.period_end
            );
            return Ok(SettlePeriodResult { settlement: None });
        }

        // Guard the zero-possible-weight case; a period of only fixed
        // rewards settles to a zero proportional amount, not NaN.
        let ratio = if total_weight != 0.0 {
            completed_weight / total_weight
        } else {
            0.0
        };
        let up_for_grabs_ratio = if total_weight != 0.0 {
            up_for_grabs_completed_weight / total_weight
        } else {
            0.0
        };

        let settlement = Settlement {
            member_id: command.member_id,
            period_start: calendar::day_key(command.period_start),
            period_end: calendar::day_key(command.period_end),
            total_weight,
            completed_weight,
            calculated_amount: ratio * command.total_allowance_amount,
            percentage: ratio * 100.0,
            up_for_grabs_contribution_percentage: up_for_grabs_ratio * 100.0,
            fixed_rewards_earned,
            completions_to_mark,
            last_calculated_at: command.now,
        };

        info!(
            "Settled {} for member {}: {:.4} of {:.2} ({:.1}%)",
            settlement.period_start,
            settlement.member_id,
            settlement.calculated_amount,
            command.total_allowance_amount,
            settlement.percentage
        );

        Ok(SettlePeriodResult {
            settlement: Some(settlement),
        })
    }

    /// Idempotency fence: flip `awarded` on every listed completion. Safe
    /// to call more than once; already-awarded records are left as they
    /// are. Returns how many records were newly marked.
    pub fn mark_completions_awarded(
        &self,
        completions: &mut [ChoreCompletion],
        completion_ids: &[String],
    ) -> usize {
        let ids: HashSet<&str> = completion_ids.iter().map(String::as_str).collect();
        let mut marked = 0;
        for completion in completions.iter_mut() {
            if ids.contains(completion.id.as_str()) && !completion.awarded {
                completion.awarded = true;
                marked += 1;
            }
        }
        debug!("Marked {} completions awarded", marked);
        marked
    }
}
