//! Application services for task workflow orchestration.

mod alerts;
mod board;
mod ledger;
mod lifecycle;
mod transition;

pub use alerts::{AlertError, DeadlineAlertService};
pub use board::{BoardError, BoardModel, BoardSyncService, CardPosition, MoveOutcome};
pub use ledger::{EffortLedgerService, EffortLogError, EffortReceipt};
pub use lifecycle::{TaskLifecycleError, TaskLifecycleService, TaskPatch};
pub use transition::{StatusTransitionService, TransitionError};
