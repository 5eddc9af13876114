use thiserror::Error;
use uuid::Uuid;

use crate::common::ReportId;
use crate::domains::content::ReportableType;
use crate::domains::moderation::machines::VALID_ACTIONS;
use crate::domains::moderation::models::ReportStatus;

/// Postgres `query_canceled`, raised when `statement_timeout` fires
const PG_QUERY_CANCELED: &str = "57014";

/// Failures of a moderation request.
///
/// `InvalidAction` and `NoteTooLong` are raised before a transaction is
/// opened. Everything else means the transaction was rolled back.
#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("Invalid moderation action '{action}'. Valid actions: {}", VALID_ACTIONS.join(", "))]
    InvalidAction { action: String },

    #[error("Admin note exceeds {max} characters")]
    NoteTooLong { max: usize },

    #[error("Report {0} not found")]
    ReportNotFound(ReportId),

    #[error("Report {report_id} was already {}", .status.as_str())]
    AlreadyReviewed {
        report_id: ReportId,
        status: ReportStatus,
    },

    #[error("Reported {} {id} no longer exists", .kind.noun())]
    ContentMissing { kind: ReportableType, id: Uuid },

    #[error("Moderation timed out")]
    Timeout,

    #[error("Storage error: {0}")]
    Storage(#[source] sqlx::Error),
}

impl From<sqlx::Error> for ModerationError {
    fn from(err: sqlx::Error) -> Self {
        let canceled = err
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == PG_QUERY_CANCELED);

        if canceled {
            ModerationError::Timeout
        } else {
            ModerationError::Storage(err)
        }
    }
}

impl ModerationError {
    /// Whether the caller sent something unacceptable, as opposed to the
    /// server failing to carry out a valid request
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ModerationError::InvalidAction { .. } | ModerationError::NoteTooLong { .. }
        )
    }
}
