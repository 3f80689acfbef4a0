//! In-memory adapters for tests and demos.

mod identity;
mod task;

pub use identity::InMemoryIdentityDirectory;
pub use task::InMemoryTaskStore;
