use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};

use crate::common::{PhotoId, UserId};

/// Moderation state of a photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Approved,
    Hidden,
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: PhotoId,
    pub user_id: Option<UserId>,
    pub title: String,
    pub is_visible: bool,
    pub moderation_status: ModerationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Photo {
    pub async fn create(user_id: UserId, title: String, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO photos (user_id, title) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(title)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id<'e>(
        id: PhotoId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM photos WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Set the moderation status and drop visibility in one statement.
    /// `None` when the photo no longer exists.
    pub async fn moderate<'e>(
        id: PhotoId,
        status: ModerationStatus,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE photos
             SET moderation_status = $2, is_visible = false, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(executor)
        .await
    }
}
