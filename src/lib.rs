//! Taskflow: team task workflow engine.
//!
//! This crate implements the core workflow rules for work items owned by
//! users within teams: who may mutate a task, how its status progresses,
//! how logged effort accumulates, how deadlines are classified for
//! alerting, and how a drag-and-drop board stays consistent with the
//! backing store through an optimistic-update/rollback protocol.
//!
//! # Architecture
//!
//! Taskflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external collaborators
//! - **Adapters**: Concrete implementations of ports (in-memory, etc.)
//!
//! # Modules
//!
//! - [`task`]: Task aggregate, authorization policy, status machine,
//!   deadline classification, effort ledger, and board synchronization
//! - [`notification`]: Domain-event dispatch, localized messages, and the
//!   per-user notification inbox

pub mod notification;
pub mod task;
