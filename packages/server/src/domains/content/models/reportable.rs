//! The content a report points at.
//!
//! Reports store `(reportable_type, reportable_id)`. `Reportable` is the
//! typed form of that pair; each variant states up front which moderation
//! columns it has, so callers never probe a row for a field.

use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::comment::Comment;
use super::photo::{ModerationStatus, Photo};
use crate::common::{CommentId, PhotoId, UserId};

/// Discriminator stored in `reports.reportable_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum ReportableType {
    Photo,
    Comment,
}

impl ReportableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportableType::Photo => "Photo",
            ReportableType::Comment => "Comment",
        }
    }

    /// Lowercase noun for user-facing text
    pub fn noun(&self) -> &'static str {
        match self {
            ReportableType::Photo => "photo",
            ReportableType::Comment => "comment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reportable {
    Photo(PhotoId),
    Comment(CommentId),
}

/// Moderation-relevant view of a content row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSnapshot {
    pub kind: ReportableType,
    pub id: Uuid,
    pub owner_id: Option<UserId>,
    pub is_visible: bool,
    /// `None` for content types without a status column
    pub moderation_status: Option<ModerationStatus>,
}

impl From<Photo> for ContentSnapshot {
    fn from(photo: Photo) -> Self {
        Self {
            kind: ReportableType::Photo,
            id: photo.id.into_uuid(),
            owner_id: photo.user_id,
            is_visible: photo.is_visible,
            moderation_status: Some(photo.moderation_status),
        }
    }
}

impl From<Comment> for ContentSnapshot {
    fn from(comment: Comment) -> Self {
        Self {
            kind: ReportableType::Comment,
            id: comment.id.into_uuid(),
            owner_id: comment.user_id,
            is_visible: comment.is_visible,
            moderation_status: None,
        }
    }
}

impl Reportable {
    pub fn from_parts(kind: ReportableType, id: Uuid) -> Self {
        match kind {
            ReportableType::Photo => Reportable::Photo(PhotoId::from_uuid(id)),
            ReportableType::Comment => Reportable::Comment(CommentId::from_uuid(id)),
        }
    }

    pub fn kind(&self) -> ReportableType {
        match self {
            Reportable::Photo(_) => ReportableType::Photo,
            Reportable::Comment(_) => ReportableType::Comment,
        }
    }

    pub fn raw_id(&self) -> Uuid {
        match self {
            Reportable::Photo(id) => id.into_uuid(),
            Reportable::Comment(id) => id.into_uuid(),
        }
    }

    pub fn has_moderation_status(&self) -> bool {
        matches!(self, Reportable::Photo(_))
    }

    pub async fn snapshot<'e>(
        &self,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<ContentSnapshot>, sqlx::Error> {
        Ok(match self {
            Reportable::Photo(id) => Photo::find_by_id(*id, executor).await?.map(Into::into),
            Reportable::Comment(id) => Comment::find_by_id(*id, executor).await?.map(Into::into),
        })
    }

    /// Take the content out of public view. `None` if the row is gone.
    pub async fn set_hidden<'e>(
        &self,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<ContentSnapshot>, sqlx::Error> {
        Ok(match self {
            Reportable::Photo(id) => Photo::moderate(*id, ModerationStatus::Hidden, executor)
                .await?
                .map(Into::into),
            Reportable::Comment(id) => Comment::hide(*id, executor).await?.map(Into::into),
        })
    }

    /// Mark the content deleted. Rows are never physically removed here.
    pub async fn set_deleted<'e>(
        &self,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<ContentSnapshot>, sqlx::Error> {
        Ok(match self {
            Reportable::Photo(id) => Photo::moderate(*id, ModerationStatus::Deleted, executor)
                .await?
                .map(Into::into),
            Reportable::Comment(id) => Comment::soft_delete(*id, executor).await?.map(Into::into),
        })
    }
}
