//! Port contracts for notification persistence.

pub mod store;

pub use store::{NotificationStore, NotificationStoreError, NotificationStoreResult};
