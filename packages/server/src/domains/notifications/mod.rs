//! Notifications domain - in-app inbox rows plus push delivery

pub mod dispatcher;
pub mod models;

pub use dispatcher::NotificationDispatcher;
pub use models::notification::{Notification, NotificationKind};
