//! Labor amounts and the append-only effort ledger entry.

use super::ids::{EntryId, TaskId, UserId};
use super::TaskDomainError;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

/// An amount of labor, tracked in whole minutes.
///
/// Minutes keep `actual_labor` a pure integer fold over ledger entries;
/// the original tracker's fractional hours map to minutes losslessly at
/// quarter-hour granularity and better.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Labor(u32);

impl Labor {
    /// Zero labor.
    pub const ZERO: Self = Self(0);

    /// Creates a labor amount from whole minutes.
    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Creates a labor amount from whole hours.
    #[must_use]
    pub const fn from_hours(hours: u32) -> Self {
        Self(hours.saturating_mul(60))
    }

    /// Returns the amount in minutes.
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Returns true when the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds another amount, saturating at the representable maximum.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Sum for Labor {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl fmt::Display for Labor {
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "whole-minute amounts split exactly into hours and minutes"
    )]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {:02}m", self.0 / 60, self.0 % 60)
    }
}

/// One appended record of logged effort.
///
/// Entries are never edited or deleted; corrections are made by logging a
/// further compensating entry. An assignment's `actual_labor` is always
/// the sum over its entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffortLogEntry {
    id: EntryId,
    task: TaskId,
    user: UserId,
    labor: Labor,
    details: String,
    logged_at: DateTime<Utc>,
}

impl EffortLogEntry {
    /// Creates a ledger entry stamped with the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyEffort`] when `labor` is zero.
    pub fn new(
        task: TaskId,
        user: UserId,
        labor: Labor,
        details: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        if labor.is_zero() {
            return Err(TaskDomainError::EmptyEffort);
        }
        Ok(Self {
            id: EntryId::new(),
            task,
            user,
            labor,
            details: details.into(),
            logged_at: clock.utc(),
        })
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    /// Returns the task the entry belongs to.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        self.task
    }

    /// Returns the user who logged the effort.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    /// Returns the logged labor amount.
    #[must_use]
    pub const fn labor(&self) -> Labor {
        self.labor
    }

    /// Returns the free-text details.
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Returns the timestamp the entry was appended.
    #[must_use]
    pub const fn logged_at(&self) -> DateTime<Utc> {
        self.logged_at
    }
}
