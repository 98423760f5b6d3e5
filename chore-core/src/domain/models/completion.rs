use serde::{Deserialize, Serialize};

use super::member::{member_ref_or_list, MemberRef};

/// Record of one member acting on one occurrence of a chore.
///
/// `due_date` is the day key of the occurrence being satisfied, not the
/// instant the record was written; the two can differ when a completion is
/// logged late. `awarded` flips exactly once, after the settlement that
/// counted this record has been committed to the ledger, which is what
/// makes settlement idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreCompletion {
    pub id: String,
    pub chore_id: String,
    /// Day key (`YYYY-MM-DD`) of the occurrence this record satisfies.
    pub due_date: String,
    pub completed: bool,
    /// Who completed it; `None` until someone does. Accepts either a single
    /// object or a one-element collection on the wire.
    #[serde(default, deserialize_with = "member_ref_or_list")]
    pub completed_by: Option<MemberRef>,
    /// Set once this completion has been folded into a settled allowance
    /// period.
    #[serde(default)]
    pub awarded: bool,
}

impl ChoreCompletion {
    /// Generate a unique id for a completion record.
    pub fn generate_id(chore_id: &str, due_date: &str) -> String {
        format!("completion::{}::{}", chore_id, due_date)
    }
}
