//! HTTP edges for admin moderation. Mounted under `/api/v1/admin`.

pub mod mutation;
pub mod query;

use axum::{
    routing::{get, post},
    Router,
};

use crate::common::auth::{Actor, AdminCapability, AuthError};
use crate::kernel::ServerDeps;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

pub use mutation::*;
pub use query::*;

pub fn admin_routes() -> Router {
    Router::new()
        .route("/reports", get(list_reports_handler))
        .route("/reports/:id", get(get_report_handler))
        .route("/reports/:id/process", post(process_report_handler))
        .route("/users/flagged", get(list_flagged_users_handler))
}

/// 401 without a token, 403 unless the caller is still an admin
pub(crate) async fn require_admin(
    auth_user: Option<AuthUser>,
    capability: AdminCapability,
    deps: &ServerDeps,
) -> Result<AuthUser, ApiError> {
    let user = auth_user.ok_or(AuthError::AuthenticationRequired)?;

    Actor::new(user.user_id, user.is_admin)
        .can(capability)
        .check(deps)
        .await?;

    Ok(user)
}
