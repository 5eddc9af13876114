use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};

use crate::common::{CommentId, PhotoId, UserId};

/// Comments have no moderation status column: hiding clears `is_visible`,
/// deleting also stamps `deleted_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: Option<UserId>,
    pub photo_id: PhotoId,
    pub body: String,
    pub is_visible: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub async fn create(
        user_id: UserId,
        photo_id: PhotoId,
        body: String,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO comments (user_id, photo_id, body) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(photo_id)
        .bind(body)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id<'e>(
        id: CommentId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn hide<'e>(
        id: CommentId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE comments SET is_visible = false, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Soft delete. An earlier deletion timestamp is kept.
    pub async fn soft_delete<'e>(
        id: CommentId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE comments
             SET is_visible = false, deleted_at = COALESCE(deleted_at, NOW()), updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}
