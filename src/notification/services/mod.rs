//! Application services for notification dispatch and the inbox.

mod catalog;
mod dispatch;

pub use catalog::{MessageCatalog, MessageKey, RenderError};
pub use dispatch::{DispatchError, NotificationDispatcher};
