//! Violation accounting for content owners.
//!
//! The count is recomputed from resolved reports on every call rather than
//! incremented, so it always matches the report history.

use sqlx::PgConnection;
use tracing::{debug, info};

use crate::common::UserId;
use crate::domains::moderation::models::ReportRecord;
use crate::domains::users::User;

/// Resolved reports at which an owner gets flagged
pub const VIOLATION_THRESHOLD: i32 = 3;

/// Resolved reports against everything `owner_id` owns
pub async fn count_violations(
    owner_id: UserId,
    conn: &mut PgConnection,
) -> Result<i32, sqlx::Error> {
    let photos = ReportRecord::count_resolved_against_photos(owner_id, &mut *conn).await?;
    let comments = ReportRecord::count_resolved_against_comments(owner_id, &mut *conn).await?;
    Ok(i32::try_from(photos + comments).unwrap_or(i32::MAX))
}

/// Recount the owner's violations and flag them at the threshold.
///
/// Returns true only when this call moved the owner from unflagged to
/// flagged. Owners that no longer exist are skipped. Runs on the caller's
/// connection so it shares the moderation transaction.
pub async fn recount_and_maybe_flag(
    owner_id: UserId,
    conn: &mut PgConnection,
) -> Result<bool, sqlx::Error> {
    let Some(owner) = User::find_for_update(owner_id, &mut *conn).await? else {
        debug!(owner_id = %owner_id, "owner missing; skipping violation accounting");
        return Ok(false);
    };

    let count = count_violations(owner_id, &mut *conn).await?;

    if count >= VIOLATION_THRESHOLD
        && !owner.violation_flagged
        && User::flag_for_violations(owner_id, count, &mut *conn).await?
    {
        info!(owner_id = %owner_id, violation_count = count, "user flagged for repeated violations");
        return Ok(true);
    }

    User::store_violation_count(owner_id, count, conn).await?;
    debug!(owner_id = %owner_id, violation_count = count, "violation count updated");
    Ok(false)
}
