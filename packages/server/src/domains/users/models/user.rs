use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::common::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

/// User row, limited to what moderation needs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    #[serde(skip_serializing)]
    pub push_token: Option<String>,
    pub violation_count: i32,
    pub violation_flagged: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub async fn create(
        email: String,
        display_name: String,
        role: UserRole,
        push_token: Option<String>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (email, display_name, role, push_token)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(email)
        .bind(display_name)
        .bind(role)
        .bind(push_token)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Load inside a transaction, locking the row until commit
    pub async fn find_for_update(
        id: UserId,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Users currently flagged for repeated violations, worst first
    pub async fn find_flagged(limit: i64, offset: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM users
             WHERE violation_flagged = true
             ORDER BY violation_count DESC, updated_at DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Overwrite the stored count; the flag is left alone
    pub async fn store_violation_count(
        id: UserId,
        count: i32,
        conn: &mut PgConnection,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET violation_count = $2, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(count)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Store the count and raise the flag. Returns false when the user was
    /// already flagged, so only one caller ever observes the transition.
    pub async fn flag_for_violations(
        id: UserId,
        count: i32,
        conn: &mut PgConnection,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users
             SET violation_count = $2, violation_flagged = true, updated_at = NOW()
             WHERE id = $1 AND violation_flagged = false",
        )
        .bind(id)
        .bind(count)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
