//! Typed ID aliases for every persisted entity.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User rows (reporters, admins and content owners).
pub struct User;

/// Marker type for Photo rows.
pub struct Photo;

/// Marker type for Comment rows.
pub struct Comment;

/// Marker type for Report rows.
pub struct Report;

/// Marker type for Notification inbox rows.
pub struct Notification;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;

pub type PhotoId = Id<Photo>;

pub type CommentId = Id<Comment>;

pub type ReportId = Id<Report>;

pub type NotificationId = Id<Notification>;
