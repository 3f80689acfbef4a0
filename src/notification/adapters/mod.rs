//! Adapter implementations of the notification ports.

mod memory;

pub use memory::InMemoryNotificationStore;
