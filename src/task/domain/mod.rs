//! Domain model for the task workflow engine.
//!
//! The task domain models assignment-scoped authorization, unrestricted
//! status transitions, calendar-date deadline classification, and the
//! append-only effort ledger while keeping all infrastructure concerns
//! outside of the domain boundary.

mod deadline;
mod effort;
mod error;
mod events;
mod ids;
pub mod policy;
mod status;
mod task;

pub use deadline::{DeadlineReport, DeadlineStanding, UPCOMING_WINDOW_DAYS, classify};
pub use effort::{EffortLogEntry, Labor};
pub use error::{AuthorizationError, ParseStatusError, TaskAction, TaskDomainError};
pub use events::TaskEvent;
pub use ids::{EntryId, TaskId, TeamId, UserId};
pub use status::TaskStatus;
pub use task::{Assignment, AssignmentRole, Priority, Task, TaskDraft};
