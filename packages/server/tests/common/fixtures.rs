//! Test fixtures for creating test data.
//!
//! Everything goes through the model methods. Emails carry a fresh UUID so
//! tests sharing the database never collide.

use anyhow::Result;
use rainbow_core::common::{ReportId, UserId};
use rainbow_core::domains::content::{Comment, Photo, Reportable};
use rainbow_core::domains::moderation::ReportRecord;
use rainbow_core::domains::users::{User, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_user(pool: &PgPool, push_token: Option<&str>) -> Result<User> {
    let tag = Uuid::new_v4();
    User::create(
        format!("user-{}@example.com", tag),
        format!("User {}", &tag.to_string()[..8]),
        UserRole::User,
        push_token.map(String::from),
        pool,
    )
    .await
}

pub async fn create_admin(pool: &PgPool) -> Result<User> {
    let tag = Uuid::new_v4();
    User::create(
        format!("admin-{}@example.com", tag),
        "Admin".to_string(),
        UserRole::Admin,
        None,
        pool,
    )
    .await
}

pub async fn create_photo(pool: &PgPool, owner: UserId) -> Result<Photo> {
    Photo::create(owner, "Double rainbow over the lake".to_string(), pool).await
}

pub async fn create_comment(pool: &PgPool, owner: UserId) -> Result<Comment> {
    let author = create_user(pool, None).await?;
    let photo = create_photo(pool, author.id).await?;
    Comment::create(owner, photo.id, "nice one".to_string(), pool).await
}

/// A pending report against `reportable`, filed by a fresh user
pub async fn create_report(pool: &PgPool, reportable: Reportable) -> Result<ReportRecord> {
    let reporter = create_user(pool, None).await?;
    ReportRecord::create(reporter.id, reportable, "inappropriate".to_string(), pool).await
}

pub async fn create_photo_report(pool: &PgPool, owner: UserId) -> Result<(Photo, ReportRecord)> {
    let photo = create_photo(pool, owner).await?;
    let report = create_report(pool, Reportable::Photo(photo.id)).await?;
    Ok((photo, report))
}

/// `count` resolved reports against separate photos of `owner`, written
/// directly so no accounting runs
pub async fn seed_resolved_reports(
    pool: &PgPool,
    owner: UserId,
    admin: UserId,
    count: usize,
) -> Result<Vec<ReportId>> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let (_, report) = create_photo_report(pool, owner).await?;
        ReportRecord::resolve(report.id, admin, None, pool).await?;
        ids.push(report.id);
    }
    Ok(ids)
}

/// Overwrite the stored accounting fields of a user
pub async fn set_violation_state(
    pool: &PgPool,
    user: UserId,
    count: i32,
    flagged: bool,
) -> Result<()> {
    sqlx::query("UPDATE users SET violation_count = $2, violation_flagged = $3 WHERE id = $1")
        .bind(user)
        .bind(count)
        .bind(flagged)
        .execute(pool)
        .await?;
    Ok(())
}
