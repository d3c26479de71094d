//! Push notification manager backed by the Story Share API.
//!
//! The platform push service (permission prompt, subscription issuing)
//! is abstracted behind [`PushService`]; this module only coordinates it
//! with the session and the remote subscription endpoints.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::sync::{Arc, Mutex};
use story_core::api::StoryApi;
use story_core::error::{Result, StoryError};
use story_core::push::{
    LocalNotification, PermissionStatus, PushNotificationManager, PushOutcome, PushSubscription,
};
use story_core::session::SessionStore;

/// The platform's push service.
#[async_trait]
pub trait PushService: Send + Sync {
    fn permission(&self) -> PermissionStatus;

    /// Asks the user for permission and returns the resulting status.
    async fn request_permission(&self) -> PermissionStatus;

    /// Looks up the subscription the platform already holds, if any.
    async fn existing_subscription(&self) -> Option<PushSubscription>;

    /// Creates a subscription for the given application server key.
    async fn subscribe(&self, application_server_key: &[u8]) -> Result<PushSubscription>;

    /// Cancels a subscription. Returns false when the platform refused.
    async fn unsubscribe(&self, subscription: &PushSubscription) -> Result<bool>;

    /// Displays a notification on this device.
    async fn show_notification(&self, notification: &LocalNotification) -> Result<()>;
}

/// Decodes a URL-safe base64 VAPID public key.
pub fn decode_application_server_key(key: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(key.trim().trim_end_matches('='))
        .map_err(|e| StoryError::config(format!("Invalid VAPID public key: {}", e)))
}

pub struct ApiPushManager {
    api: Arc<dyn StoryApi>,
    session: Arc<dyn SessionStore>,
    service: Arc<dyn PushService>,
    application_server_key: Vec<u8>,
    subscription: Mutex<Option<PushSubscription>>,
}

impl ApiPushManager {
    pub fn new(
        api: Arc<dyn StoryApi>,
        session: Arc<dyn SessionStore>,
        service: Arc<dyn PushService>,
        vapid_public_key: &str,
    ) -> Result<Self> {
        Ok(Self {
            api,
            session,
            service,
            application_server_key: decode_application_server_key(vapid_public_key)?,
            subscription: Mutex::new(None),
        })
    }

    fn cached(&self) -> Option<PushSubscription> {
        self.subscription.lock().ok().and_then(|s| s.clone())
    }

    fn store(&self, subscription: Option<PushSubscription>) {
        if let Ok(mut slot) = self.subscription.lock() {
            *slot = subscription;
        }
    }
}

#[async_trait]
impl PushNotificationManager for ApiPushManager {
    fn permission_status(&self) -> PermissionStatus {
        self.service.permission()
    }

    async fn is_subscribed(&self) -> Result<bool> {
        if self.cached().is_some() {
            return Ok(true);
        }
        let existing = self.service.existing_subscription().await;
        let subscribed = existing.is_some();
        self.store(existing);
        Ok(subscribed)
    }

    async fn subscribe(&self) -> Result<PushOutcome> {
        if self.service.request_permission().await != PermissionStatus::Granted {
            return Err(StoryError::resource("Permission denied for notifications"));
        }

        let token = self
            .session
            .token()
            .ok_or_else(|| StoryError::unauthorized("User not authenticated"))?;

        let subscription = self.service.subscribe(&self.application_server_key).await?;
        let registered = match self.api.subscribe_push(&token, &subscription).await {
            Ok(envelope) => envelope.into_result(),
            Err(e) => Err(e),
        };
        if let Err(e) = registered {
            // The server does not know this endpoint; drop it locally too
            if let Err(rollback) = self.service.unsubscribe(&subscription).await {
                tracing::warn!("[ApiPushManager] Rollback of local subscription failed: {}", rollback);
            }
            return Err(e);
        }

        tracing::info!("[ApiPushManager] Subscribed {}", subscription.endpoint);
        self.store(Some(subscription));
        Ok(PushOutcome {
            message: "Successfully subscribed to push notifications".to_string(),
        })
    }

    async fn unsubscribe(&self) -> Result<PushOutcome> {
        let subscription = match self.cached() {
            Some(subscription) => subscription,
            None => self
                .service
                .existing_subscription()
                .await
                .ok_or_else(|| StoryError::resource("No active subscription found"))?,
        };

        if !self.service.unsubscribe(&subscription).await? {
            return Err(StoryError::resource("Failed to unsubscribe"));
        }

        if let Some(token) = self.session.token() {
            match self.api.unsubscribe_push(&token, &subscription.endpoint).await {
                Ok(envelope) if envelope.is_error() => tracing::warn!(
                    "[ApiPushManager] Server rejected unsubscription: {}",
                    envelope.message()
                ),
                Ok(_) => tracing::debug!("[ApiPushManager] Unsubscription sent to server"),
                Err(e) => tracing::warn!(
                    "[ApiPushManager] Failed to notify server about unsubscription: {}",
                    e
                ),
            }
        }

        self.store(None);
        Ok(PushOutcome {
            message: "Successfully unsubscribed from push notifications".to_string(),
        })
    }

    async fn show_local(&self, notification: &LocalNotification) -> Result<()> {
        if self.service.permission() != PermissionStatus::Granted {
            return Err(StoryError::resource("Notifications are not enabled"));
        }
        self.service.show_notification(notification).await?;
        tracing::debug!("[ApiPushManager] Showed '{}'", notification.tag);
        Ok(())
    }
}

/// A push service with a fixed permission and a pre-issued subscription.
///
/// Stands in for the browser push service when running headless.
pub struct StaticPushService {
    permission: Mutex<PermissionStatus>,
    subscription: PushSubscription,
    active: Mutex<bool>,
    shown: Mutex<Vec<LocalNotification>>,
}

impl StaticPushService {
    pub fn new(permission: PermissionStatus, subscription: PushSubscription) -> Self {
        Self {
            permission: Mutex::new(permission),
            subscription,
            active: Mutex::new(false),
            shown: Mutex::new(Vec::new()),
        }
    }

    /// Notifications displayed so far, oldest first.
    pub fn shown(&self) -> Vec<LocalNotification> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PushService for StaticPushService {
    fn permission(&self) -> PermissionStatus {
        self.permission
            .lock()
            .map(|p| *p)
            .unwrap_or(PermissionStatus::Unsupported)
    }

    async fn request_permission(&self) -> PermissionStatus {
        let mut permission = match self.permission.lock() {
            Ok(permission) => permission,
            Err(_) => return PermissionStatus::Unsupported,
        };
        if *permission == PermissionStatus::Default {
            *permission = PermissionStatus::Granted;
        }
        *permission
    }

    async fn existing_subscription(&self) -> Option<PushSubscription> {
        let active = self.active.lock().map(|a| *a).unwrap_or(false);
        active.then(|| self.subscription.clone())
    }

    async fn subscribe(&self, _application_server_key: &[u8]) -> Result<PushSubscription> {
        *self
            .active
            .lock()
            .map_err(|_| StoryError::internal("push state poisoned"))? = true;
        Ok(self.subscription.clone())
    }

    async fn unsubscribe(&self, subscription: &PushSubscription) -> Result<bool> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| StoryError::internal("push state poisoned"))?;
        if *active && subscription.endpoint == self.subscription.endpoint {
            *active = false;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn show_notification(&self, notification: &LocalNotification) -> Result<()> {
        tracing::info!(
            "[StaticPushService] {}: {}",
            notification.title,
            notification.body
        );
        self.shown
            .lock()
            .map_err(|_| StoryError::internal("push state poisoned"))?
            .push(notification.clone());
        Ok(())
    }
}
