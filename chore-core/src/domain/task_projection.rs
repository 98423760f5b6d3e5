//! Day-break task series projection.
//!
//! A task series is a flat ordered list where marker nodes split the list
//! into blocks. One block is visible per scheduled occurrence of the
//! series' recurrence rule: the first block on the anchor day, the next
//! after the next occurrence boundary, and so on. Once a family has
//! worked through blocks, advancement counts forward from where they
//! actually are (derived from completion history), not from the start
//! date, so falling behind schedule never silently skips a block.

use chrono::NaiveDate;

use crate::domain::calendar;
use crate::domain::models::Task;
use crate::domain::recurrence::RecurrenceService;

#[derive(Debug, Clone, Default)]
pub struct TaskProjectionService {
    resolver: RecurrenceService,
}

impl TaskProjectionService {
    pub fn new() -> Self {
        Self {
            resolver: RecurrenceService::new(),
        }
    }

    /// The tasks visible on `as_of`, in list order.
    ///
    /// Past dates (behind the series' current position) reconstruct
    /// history: only tasks completed on exactly that day are returned. On
    /// or ahead of the current position, the block at the elapsed-
    /// occurrence offset is returned; an unscheduled day between
    /// occurrences still shows the current block rather than blanking the
    /// view. Past the last block, nothing is returned.
    pub fn tasks_for_date(
        &self,
        tasks: &[Task],
        rule: Option<&str>,
        start_date: NaiveDate,
        as_of: NaiveDate,
    ) -> Vec<Task> {
        let blocks = partition_blocks(tasks);
        if blocks.is_empty() {
            return Vec::new();
        }

        let first_incomplete = blocks
            .iter()
            .position(|block| block.iter().any(|task| !task.completed));
        let resumed_from = match first_incomplete {
            Some(index) => latest_completion_day(&blocks[..index]),
            None => latest_completion_day(&blocks),
        };

        // Dates behind the current position are history, not a live block.
        let behind_current = as_of < start_date
            || resumed_from.map_or(false, |last_done| as_of <= last_done);
        if behind_current {
            return completed_on(tasks, as_of);
        }

        let first_incomplete = match first_incomplete {
            Some(index) => index,
            // Everything is done and the date is not historical.
            None => return Vec::new(),
        };

        let block_index = match resumed_from {
            Some(last_done) => {
                // The first incomplete block activates at the first
                // occurrence after the last completed day; count boundaries
                // from there. The rule stays anchored at the start date.
                let crossed = match last_done.succ_opt() {
                    Some(from) if from <= as_of => self
                        .resolver
                        .occurrences_between(rule, start_date, from, as_of)
                        .len(),
                    _ => 0,
                };
                first_incomplete + crossed.saturating_sub(1)
            }
            None => self
                .resolver
                .occurrences_since_start(rule, start_date, as_of) as usize,
        };

        blocks
            .get(block_index)
            .map(|block| block.iter().map(|task| (*task).clone()).collect())
            .unwrap_or_default()
    }

    /// True when `date` is a scheduled occurrence of the series and the
    /// projection still has tasks to show for it.
    pub fn is_series_active_for_date(
        &self,
        tasks: &[Task],
        rule: Option<&str>,
        start_date: NaiveDate,
        date: NaiveDate,
    ) -> bool {
        self.resolver.is_occurrence(rule, start_date, date)
            && !self.tasks_for_date(tasks, rule, start_date, date).is_empty()
    }

    /// One level of checklist bubbling: true when `parent` has children and
    /// every one of them is completed. Never completes the parent itself.
    pub fn children_complete(&self, tasks: &[Task], parent: &Task) -> bool {
        let mut seen_child = false;
        for task in tasks {
            if task.is_day_break || task.parent_id.as_deref() != Some(parent.id.as_str()) {
                continue;
            }
            seen_child = true;
            if !task.completed {
                return false;
            }
        }
        seen_child
    }
}

/// Split the flat list at day-break markers, in `order` order. A leading or
/// trailing break with nothing beside it is trimmed so an empty block never
/// renders; interior structure is preserved as authored.
fn partition_blocks(tasks: &[Task]) -> Vec<Vec<&Task>> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by_key(|task| task.order);

    let mut blocks: Vec<Vec<&Task>> = vec![Vec::new()];
    for task in ordered {
        if task.is_day_break {
            blocks.push(Vec::new());
        } else {
            blocks
                .last_mut()
                .expect("blocks always holds at least one block")
                .push(task);
        }
    }

    while blocks.first().map_or(false, |block| block.is_empty()) {
        blocks.remove(0);
    }
    while blocks.last().map_or(false, |block| block.is_empty()) {
        blocks.pop();
    }
    blocks
}

/// Latest completed-on day across the given blocks, if any task in them
/// carries one.
fn latest_completion_day(blocks: &[Vec<&Task>]) -> Option<NaiveDate> {
    blocks
        .iter()
        .flatten()
        .filter(|task| task.completed)
        .filter_map(|task| task.completed_on_date.as_deref())
        .filter_map(calendar::parse_day_key)
        .max()
}

fn completed_on(tasks: &[Task], day: NaiveDate) -> Vec<Task> {
    let mut matching: Vec<Task> = tasks
        .iter()
        .filter(|task| !task.is_day_break && task.completed)
        .filter(|task| {
            task.completed_on_date
                .as_deref()
                .map_or(false, |done| calendar::matches_day(done, day))
        })
        .cloned()
        .collect();
    matching.sort_by_key(|task| task.order);
    matching
}
