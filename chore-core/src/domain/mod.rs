pub mod calendar;
pub mod commands;
pub mod completion;
pub mod models;
pub mod preview;
pub mod recurrence;
pub mod rotation;
pub mod settlement;
pub mod task_projection;

pub use completion::CompletionService;
pub use preview::PreviewService;
pub use recurrence::RecurrenceService;
pub use rotation::RotationService;
pub use settlement::SettlementService;
pub use task_projection::TaskProjectionService;
