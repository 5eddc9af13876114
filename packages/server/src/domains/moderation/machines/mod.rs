//! Report review state machine
//!
//! Pure decision logic - NO IO. Given the report's current status and the
//! admin's chosen action, decide the terminal status and what happens to
//! the reported content.
//!
//! ```text
//! pending --approve--> dismissed
//! pending --hide-----> resolved   (content hidden)
//! pending --delete---> resolved   (content deleted)
//! ```
//!
//! Terminal states accept nothing.

use std::fmt;
use std::str::FromStr;

use crate::domains::moderation::errors::ModerationError;
use crate::domains::moderation::models::ReportStatus;
use crate::domains::notifications::NotificationKind;

pub const VALID_ACTIONS: [&str; 3] = ["approve", "hide", "delete"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModerationAction {
    Approve,
    Hide,
    Delete,
}

/// What an action does to the reported content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEffect {
    Untouched,
    Hide,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    AlreadyReviewed { current: ReportStatus },
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Approve => "approve",
            ModerationAction::Hide => "hide",
            ModerationAction::Delete => "delete",
        }
    }

    pub fn target_status(&self) -> ReportStatus {
        match self {
            ModerationAction::Approve => ReportStatus::Dismissed,
            ModerationAction::Hide | ModerationAction::Delete => ReportStatus::Resolved,
        }
    }

    pub fn content_effect(&self) -> ContentEffect {
        match self {
            ModerationAction::Approve => ContentEffect::Untouched,
            ModerationAction::Hide => ContentEffect::Hide,
            ModerationAction::Delete => ContentEffect::Delete,
        }
    }

    /// Penalizing actions count toward the owner's violations
    pub fn is_penalty(&self) -> bool {
        self.content_effect() != ContentEffect::Untouched
    }

    /// Owners hear about penalties only
    pub fn notification_kind(&self) -> Option<NotificationKind> {
        match self {
            ModerationAction::Approve => None,
            ModerationAction::Hide => Some(NotificationKind::ContentHidden),
            ModerationAction::Delete => Some(NotificationKind::ContentDeleted),
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationAction {
    type Err = ModerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(ModerationAction::Approve),
            "hide" => Ok(ModerationAction::Hide),
            "delete" => Ok(ModerationAction::Delete),
            other => Err(ModerationError::InvalidAction {
                action: other.to_string(),
            }),
        }
    }
}

/// Decide the status a report moves to
pub fn decide(
    current: ReportStatus,
    action: ModerationAction,
) -> Result<ReportStatus, TransitionError> {
    if current.is_reviewed() {
        return Err(TransitionError::AlreadyReviewed { current });
    }
    Ok(action.target_status())
}

impl ReportStatus {
    /// Method form of [`decide`]
    pub fn transition(self, action: ModerationAction) -> Result<ReportStatus, TransitionError> {
        decide(self, action)
    }
}
