//! Push notification contract.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Notification permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user has not been asked yet
    Default,
    /// The platform has no push support
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

/// A push subscription as issued by the platform's push service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: PushKeys,
}

/// Result of a successful subscribe/unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    pub message: String,
}

/// A notification shown locally, without a round trip to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalNotification {
    pub title: String,
    pub body: String,
    /// Notifications sharing a tag replace each other
    pub tag: String,
}

impl LocalNotification {
    /// The notification sent from the profile page to check delivery.
    pub fn test() -> Self {
        Self {
            title: "Test Notification".to_string(),
            body: "This is a test notification from your Story App!".to_string(),
            tag: "test-notification".to_string(),
        }
    }
}

#[async_trait]
pub trait PushNotificationManager: Send + Sync {
    fn permission_status(&self) -> PermissionStatus;

    /// Whether the platform holds a subscription for this application.
    async fn is_subscribed(&self) -> Result<bool>;

    async fn subscribe(&self) -> Result<PushOutcome>;

    async fn unsubscribe(&self) -> Result<PushOutcome>;

    /// Shows `notification` on this device. Requires granted permission.
    async fn show_local(&self, notification: &LocalNotification) -> Result<()>;
}
