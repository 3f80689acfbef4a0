//! Identity/team collaborator port.
//!
//! Resolves user identifiers to their organizational role and team. The
//! directory is read-only and trusted; the authorization policy itself
//! never consults the role (see [`crate::task::domain::policy`]), but the
//! deadline alert service uses it to scope team queries by role.

use crate::task::domain::{TeamId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Organizational role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular team member.
    Employee,
    /// Team manager.
    Manager,
}

/// Resolved identity of an acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User identifier.
    pub id: UserId,
    /// Organizational role.
    pub role: UserRole,
    /// Team membership.
    pub team: TeamId,
}

/// Identity resolution contract.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Resolves a user identifier.
    ///
    /// Returns `None` for unknown users.
    async fn resolve(&self, user: UserId) -> Result<Option<Principal>, IdentityError>;
}

/// Errors returned by identity directory implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// Transport-layer failure.
    #[error("identity lookup failed: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
