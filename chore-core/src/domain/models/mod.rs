pub mod chore;
pub mod completion;
pub mod member;
pub mod task;

pub use chore::{Chore, ChoreAssignment, RewardType, RotationType};
pub use completion::ChoreCompletion;
pub use member::MemberRef;
pub use task::Task;
