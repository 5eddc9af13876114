//! Moderation entry points. Callers have already passed the admin check.

pub mod process_report;
pub mod violations;
