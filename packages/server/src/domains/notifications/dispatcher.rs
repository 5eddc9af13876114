//! Best-effort delivery of user notifications.
//!
//! Every send writes an inbox row first so the app can show the message
//! even when push delivery fails or the user has no device registered.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::models::{Notification, NotificationKind};
use crate::domains::users::User;
use crate::kernel::{BasePushNotificationService, ServerDeps};

pub struct NotificationDispatcher {
    pool: PgPool,
    push: Arc<dyn BasePushNotificationService>,
    push_timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(
        pool: PgPool,
        push: Arc<dyn BasePushNotificationService>,
        push_timeout: Duration,
    ) -> Self {
        Self {
            pool,
            push,
            push_timeout,
        }
    }

    pub fn from_deps(deps: &ServerDeps) -> Self {
        Self::new(
            deps.db_pool.clone(),
            deps.push_service.clone(),
            deps.moderation.notification_timeout,
        )
    }

    pub async fn send(
        &self,
        user: &User,
        title: &str,
        body: &str,
        data: serde_json::Value,
        kind: NotificationKind,
    ) -> Result<()> {
        let mut data = data;
        if let Some(map) = data.as_object_mut() {
            map.insert("kind".to_string(), kind.as_str().into());
        }

        let notification = Notification::create(user.id, kind, title, body, &data, &self.pool)
            .await
            .context("Failed to store notification")?;

        let Some(push_token) = user.push_token.as_deref() else {
            debug!(user_id = %user.id, "no push token registered; inbox only");
            return Ok(());
        };

        tokio::time::timeout(
            self.push_timeout,
            self.push.send_notification(push_token, title, body, data),
        )
        .await
        .context("Push delivery timed out")?
        .context("Push delivery failed")?;

        info!(
            user_id = %user.id,
            notification_id = %notification.id,
            kind = kind.as_str(),
            "notification delivered"
        );
        Ok(())
    }
}
