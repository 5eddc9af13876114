//! Users domain - the account fields moderation reads and writes

pub mod models;

pub use models::user::{User, UserRole};
