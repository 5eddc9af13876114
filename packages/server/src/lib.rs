// Rainbow moderation API core
//
// Admin review of user reports against photos and comments: content
// moderation, violation accounting and owner notifications.
//
// Each domain under domains/ follows the same layout: models (sqlx rows),
// machines (pure decisions), actions (transactions), data (API shapes) and
// edges (HTTP handlers).

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
