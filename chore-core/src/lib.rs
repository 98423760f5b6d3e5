//! Chore scheduling and allowance settlement engine.
//!
//! Pure domain logic for a family chore chart: recurrence resolution,
//! rotation assignment, day-break task series projection, completion/XP
//! tracking, and proportional allowance settlement. Everything here is a
//! side-effect-free function over calendar dates and in-memory records;
//! storage, auth, ledger bookkeeping, and UI live elsewhere and talk to
//! this crate through plain values. All date identifiers crossing the
//! boundary are `YYYY-MM-DD` day keys in UTC.

pub mod domain;

pub use domain::calendar;
pub use domain::completion::CompletionService;
pub use domain::models;
pub use domain::preview::PreviewService;
pub use domain::recurrence::RecurrenceService;
pub use domain::rotation::RotationService;
pub use domain::settlement::SettlementService;
pub use domain::task_projection::TaskProjectionService;
