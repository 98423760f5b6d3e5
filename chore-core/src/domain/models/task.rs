use serde::{Deserialize, Serialize};

/// One node in a day-break-delimited task series.
///
/// The flat list is ordered by `order`; nodes with `is_day_break` are
/// markers separating the list into daily-advancing blocks and never render
/// as real tasks. A task may nest one level under a parent for checklist
/// display; completing every child bubbles a "children complete" signal to
/// the parent but never auto-completes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Position in the flat series list.
    pub order: i32,
    #[serde(default)]
    pub is_day_break: bool,
    #[serde(default)]
    pub completed: bool,
    /// Day key (`YYYY-MM-DD`) the task was completed on; set only when
    /// `completed` is true.
    #[serde(default)]
    pub completed_on_date: Option<String>,
    /// Parent task id for one level of checklist nesting.
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Task {
    /// Generate a unique id for a task.
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("task::{}", timestamp_millis)
    }

    /// Convenience constructor for a day-break marker.
    pub fn day_break(id: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            order,
            is_day_break: true,
            completed: false,
            completed_on_date: None,
            parent_id: None,
        }
    }
}
