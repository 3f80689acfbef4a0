//! In-memory identity directory for workflow tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::domain::UserId;
use crate::task::ports::{IdentityDirectory, IdentityError, Principal};

/// Thread-safe in-memory identity directory.
#[derive(Clone, Default)]
pub struct InMemoryIdentityDirectory {
    state: Arc<RwLock<HashMap<UserId, Principal>>>,
}

impl InMemoryIdentityDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a principal, replacing any existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Transport`] when the directory lock is
    /// poisoned.
    pub fn register(&self, principal: Principal) -> Result<(), IdentityError> {
        let mut state = self
            .state
            .write()
            .map_err(|err| IdentityError::transport(std::io::Error::other(err.to_string())))?;
        state.insert(principal.id, principal);
        Ok(())
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn resolve(&self, user: UserId) -> Result<Option<Principal>, IdentityError> {
        let state = self
            .state
            .read()
            .map_err(|err| IdentityError::transport(std::io::Error::other(err.to_string())))?;
        Ok(state.get(&user).copied())
    }
}
