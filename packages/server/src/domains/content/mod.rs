//! Content domain - photos and comments as moderation targets
//!
//! Upload, feeds and comment threads live in the public API. This module
//! only carries the columns moderation touches and the `Reportable` sum
//! type that lets a report point at either kind.

pub mod models;

pub use models::comment::Comment;
pub use models::photo::{ModerationStatus, Photo};
pub use models::reportable::{ContentSnapshot, Reportable, ReportableType};
