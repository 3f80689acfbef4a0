//! Domain model for notifications.

mod notification;

pub use notification::{Locale, Notification, NotificationId, NotificationKind};
