// Business domains
pub mod auth;
pub mod content;
pub mod moderation;
pub mod notifications;
pub mod users;
