//! Port contracts for the task workflow engine.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod identity;
pub mod store;

pub use identity::{IdentityDirectory, IdentityError, Principal, UserRole};
pub use store::{TaskFilter, TaskStore, TaskStoreError, TaskStoreResult};
