//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ModerationSettings, ServerDeps};
pub use test_dependencies::MockPushNotificationService;
pub use traits::*;
