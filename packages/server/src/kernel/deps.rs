//! Server dependencies shared by handlers and domain actions.
//!
//! External services sit behind kernel traits so tests can swap in mocks.

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::common::auth::HasAuthContext;
use crate::domains::auth::JwtService;
use crate::kernel::BasePushNotificationService;

/// Timeouts bounding a moderation request
#[derive(Debug, Clone, Copy)]
pub struct ModerationSettings {
    /// Transaction-local `statement_timeout` for the moderation transaction
    pub statement_timeout: Duration,
    /// Upper bound on the post-commit notification call
    pub notification_timeout: Duration,
}

impl Default for ModerationSettings {
    fn default() -> Self {
        Self {
            statement_timeout: Duration::from_millis(5_000),
            notification_timeout: Duration::from_millis(3_000),
        }
    }
}

/// Server dependencies accessible to handlers and actions
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub push_service: Arc<dyn BasePushNotificationService>,
    pub jwt_service: Arc<JwtService>,
    pub moderation: ModerationSettings,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        push_service: Arc<dyn BasePushNotificationService>,
        jwt_service: Arc<JwtService>,
        moderation: ModerationSettings,
    ) -> Self {
        Self {
            db_pool,
            push_service,
            jwt_service,
            moderation,
        }
    }
}

impl HasAuthContext for ServerDeps {
    fn auth_pool(&self) -> &PgPool {
        &self.db_pool
    }
}
