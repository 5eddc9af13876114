//! Moderation domain - admin review of user reports
//!
//! An admin picks one action per pending report:
//!
//! - `approve`: the report was unfounded; it is dismissed and the content stays up
//! - `hide`: the content leaves public view and the report is resolved
//! - `delete`: the content is marked deleted and the report is resolved
//!
//! `hide` and `delete` count against the content owner, who is flagged once
//! their resolved-report total reaches `VIOLATION_THRESHOLD`. The owner is
//! notified after the transaction commits.

pub mod actions;
pub mod data;
pub mod edges;
pub mod errors;
pub mod machines;
pub mod messages;
pub mod models;

pub use actions::process_report::{process_report, ProcessedReport};
pub use actions::violations::{count_violations, recount_and_maybe_flag, VIOLATION_THRESHOLD};
pub use errors::ModerationError;
pub use machines::{ModerationAction, VALID_ACTIONS};
pub use models::report::{ReportRecord, ReportStatus};
