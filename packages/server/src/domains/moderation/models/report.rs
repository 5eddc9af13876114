use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::common::{ReportId, UserId};
use crate::domains::content::{Reportable, ReportableType};

pub const MAX_REASON_LENGTH: usize = 1000;
pub const MAX_ADMIN_NOTE_LENGTH: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }

    /// Resolved and dismissed are terminal
    pub fn is_reviewed(&self) -> bool {
        !matches!(self, ReportStatus::Pending)
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "resolved" => Ok(ReportStatus::Resolved),
            "dismissed" => Ok(ReportStatus::Dismissed),
            other => Err(format!("unknown report status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportRecord {
    pub id: ReportId,
    pub reporter_id: UserId,
    pub reportable_type: ReportableType,
    pub reportable_id: Uuid,
    pub reason: String,
    pub admin_note: Option<String>,
    pub status: ReportStatus,
    pub resolved_by_id: Option<UserId>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReportRecord {
    pub fn reportable(&self) -> Reportable {
        Reportable::from_parts(self.reportable_type, self.reportable_id)
    }

    pub fn is_reviewed(&self) -> bool {
        self.status.is_reviewed()
    }

    /// File a new report. Always starts pending.
    pub async fn create(
        reporter_id: UserId,
        reportable: Reportable,
        reason: String,
        pool: &PgPool,
    ) -> Result<Self> {
        if reason.chars().count() > MAX_REASON_LENGTH {
            anyhow::bail!("reason exceeds {} characters", MAX_REASON_LENGTH);
        }

        sqlx::query_as::<_, Self>(
            "INSERT INTO reports (reporter_id, reportable_type, reportable_id, reason)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(reporter_id)
        .bind(reportable.kind())
        .bind(reportable.raw_id())
        .bind(reason)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id<'e>(
        id: ReportId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Load and lock; a concurrent reviewer blocks here until we commit
    pub async fn find_for_update(
        id: ReportId,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM reports WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Newest first, optionally restricted to one status
    pub async fn query(
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM reports
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn resolve<'e>(
        id: ReportId,
        admin_id: UserId,
        admin_note: Option<String>,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        Self::close(id, ReportStatus::Resolved, admin_id, admin_note, executor).await
    }

    pub async fn dismiss<'e>(
        id: ReportId,
        admin_id: UserId,
        admin_note: Option<String>,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        Self::close(id, ReportStatus::Dismissed, admin_id, admin_note, executor).await
    }

    /// Move a pending report to a terminal status.
    ///
    /// The update only matches pending rows, so `None` means the report is
    /// missing or was reviewed by someone else first.
    pub async fn close<'e>(
        id: ReportId,
        status: ReportStatus,
        admin_id: UserId,
        admin_note: Option<String>,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        debug_assert!(status.is_reviewed());

        sqlx::query_as::<_, Self>(
            "UPDATE reports
             SET status = $2, resolved_by_id = $3, admin_note = $4,
                 resolved_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(admin_id)
        .bind(admin_note)
        .fetch_optional(executor)
        .await
    }

    /// Resolved reports against photos owned by `owner_id`
    pub async fn count_resolved_against_photos<'e>(
        owner_id: UserId,
        executor: impl PgExecutor<'e>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM reports r
             JOIN photos p ON p.id = r.reportable_id
             WHERE r.reportable_type = 'Photo'
               AND r.status = 'resolved'
               AND p.user_id = $1",
        )
        .bind(owner_id)
        .fetch_one(executor)
        .await
    }

    /// Resolved reports against comments owned by `owner_id`
    pub async fn count_resolved_against_comments<'e>(
        owner_id: UserId,
        executor: impl PgExecutor<'e>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM reports r
             JOIN comments c ON c.id = r.reportable_id
             WHERE r.reportable_type = 'Comment'
               AND r.status = 'resolved'
               AND c.user_id = $1",
        )
        .bind(owner_id)
        .fetch_one(executor)
        .await
    }
}
