use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::common::UserId;
use crate::domains::users::User;

/// Row of the flagged-users review list
#[derive(Debug, Clone, Serialize)]
pub struct FlaggedUserData {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub violation_count: i32,
    pub violation_flagged: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for FlaggedUserData {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            violation_count: user.violation_count,
            violation_flagged: user.violation_flagged,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlaggedUserPage {
    pub users: Vec<FlaggedUserData>,
    pub page: i64,
    pub per_page: i64,
}
