//! Authorization policy for task mutation.
//!
//! Pure, side-effect-free predicates over `(task, actor)`. Capability
//! derives entirely from task creatorship and assignment roles; team
//! membership and the actor's organizational role are never consulted. In
//! particular a manager who neither created a task nor holds an
//! assignee-role assignment on it cannot change its status. That is a
//! deliberate, preserved policy decision (see DESIGN.md), not an
//! oversight.

use super::task::{AssignmentRole, Task};
use super::ids::UserId;

/// True iff `actor` may edit the task's metadata (description, dates,
/// priority, planned labor, assignments). Creator only.
#[must_use]
pub fn can_edit_metadata(task: &Task, actor: UserId) -> bool {
    task.creator() == actor
}

/// True iff `actor` may delete the task and its child records. Creator
/// only.
#[must_use]
pub fn can_delete(task: &Task, actor: UserId) -> bool {
    can_edit_metadata(task, actor)
}

/// True iff `actor` may move the task between statuses: the creator, or
/// any holder of an assignee-role assignment.
#[must_use]
pub fn can_change_status(task: &Task, actor: UserId) -> bool {
    task.creator() == actor
        || task
            .assignment_for(actor)
            .is_some_and(|a| a.role() == AssignmentRole::Assignee)
}

/// True iff `actor` may append to the effort ledger: any assignment
/// holder, assignee or partner.
#[must_use]
pub fn can_log_effort(task: &Task, actor: UserId) -> bool {
    task.assignment_for(actor).is_some()
}
