// Mock implementations of kernel traits for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::BasePushNotificationService;

// =============================================================================
// Mock Push Notification Service
// =============================================================================

/// (push_token, title, body, data)
pub type SentNotification = (String, String, String, serde_json::Value);

#[derive(Clone, Default)]
pub struct MockPushNotificationService {
    sent_notifications: Arc<Mutex<Vec<SentNotification>>>,
    fail: Arc<AtomicBool>,
}

impl MockPushNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service whose every send returns an error
    pub fn failing() -> Self {
        let service = Self::new();
        service.set_failing(true);
        service
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Get all notifications that were sent
    pub fn sent_notifications(&self) -> Vec<SentNotification> {
        self.sent_notifications.lock().unwrap().clone()
    }

    /// Check if a notification was sent with the given title
    pub fn was_sent_with_title(&self, title: &str) -> bool {
        self.sent_notifications
            .lock()
            .unwrap()
            .iter()
            .any(|(_, t, _, _)| t == title)
    }
}

#[async_trait]
impl BasePushNotificationService for MockPushNotificationService {
    async fn send_notification(
        &self,
        push_token: &str,
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("push gateway unavailable");
        }

        self.sent_notifications.lock().unwrap().push((
            push_token.to_string(),
            title.to_string(),
            body.to_string(),
            data,
        ));
        Ok(())
    }
}
