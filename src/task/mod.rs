//! Task workflow management for Taskflow.
//!
//! This module implements the workflow engine proper: the authorization
//! policy governing who may mutate a task, the unrestricted status state
//! machine, calendar-date deadline classification shared by every alerting
//! surface, the append-only effort ledger, and the optimistic
//! move/confirm-or-rollback protocol behind the drag-and-drop board. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
