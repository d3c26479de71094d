//! Profile presenter: account details, notification settings and logout.

use crate::document::AlertLevel;
use crate::lifecycle::ActivationToken;
use crate::navigator::Navigator;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use story_core::config::AppConfig;
use story_core::push::{LocalNotification, PermissionStatus, PushNotificationManager};
use story_core::session::{SessionStore, SessionUser};

pub trait ProfileView: Send + Sync {
    fn prompt_sign_in(&self);
    fn show_profile(&self, user: &SessionUser);

    /// Disables the toggle while a subscription change is in flight.
    fn show_notification_busy(&self);
    fn show_notification_status(&self, subscribed: bool);
    fn show_notification_unavailable(&self, message: &str);

    fn show_logged_out(&self, message: &str);
    fn show_error(&self, message: &str);

    /// Raises a transient alert next to the terminal update.
    fn notify(&self, level: AlertLevel, message: &str);
}

pub struct ProfilePresenter {
    view: Arc<dyn ProfileView>,
    session: Arc<dyn SessionStore>,
    push: Arc<dyn PushNotificationManager>,
    navigator: Navigator,
    token: ActivationToken,
    redirect_delay: Duration,
    subscribed: AtomicBool,
}

impl ProfilePresenter {
    pub fn new(
        view: Arc<dyn ProfileView>,
        session: Arc<dyn SessionStore>,
        push: Arc<dyn PushNotificationManager>,
        navigator: Navigator,
        token: ActivationToken,
        config: &AppConfig,
    ) -> Self {
        Self {
            view,
            session,
            push,
            navigator,
            token,
            redirect_delay: config.timing.redirect_delay(),
            subscribed: AtomicBool::new(false),
        }
    }

    /// Shows the signed-in user.
    ///
    /// # Returns
    ///
    /// `false` when nobody is signed in; the view was asked to prompt
    /// for sign-in instead.
    pub fn load_profile(&self) -> bool {
        match self.session.user() {
            Some(user) => {
                self.view.show_profile(&user);
                true
            }
            None => {
                tracing::info!("[ProfilePresenter] No session, asking user to sign in");
                self.view.prompt_sign_in();
                false
            }
        }
    }

    pub async fn load_notification_status(&self) {
        match self.push.permission_status() {
            PermissionStatus::Unsupported => {
                self.view.show_notification_unavailable(
                    "Push notifications are not supported in this browser",
                );
            }
            PermissionStatus::Denied => {
                self.view.show_notification_unavailable(
                    "Notifications are blocked. Please enable them in your browser settings.",
                );
            }
            PermissionStatus::Granted | PermissionStatus::Default => {
                match self.push.is_subscribed().await {
                    Ok(subscribed) => {
                        self.subscribed.store(subscribed, Ordering::SeqCst);
                        self.view.show_notification_status(subscribed);
                    }
                    Err(e) => {
                        tracing::error!(
                            "[ProfilePresenter] Error checking notification status: {}",
                            e
                        );
                        self.view
                            .show_notification_unavailable("Error checking notification status");
                    }
                }
            }
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }

    /// Subscribes when currently unsubscribed and vice versa.
    pub async fn toggle_notifications(&self) {
        self.view.show_notification_busy();

        let subscribed = self.is_subscribed();
        let outcome = if subscribed {
            self.push.unsubscribe().await
        } else {
            self.push.subscribe().await
        };

        match outcome {
            Ok(outcome) => {
                let now = !subscribed;
                self.subscribed.store(now, Ordering::SeqCst);
                tracing::info!("[ProfilePresenter] {}", outcome.message);
                self.view.notify(AlertLevel::Success, &outcome.message);
                self.view.show_notification_status(now);
            }
            Err(e) => {
                tracing::error!("[ProfilePresenter] Error toggling notifications: {}", e);
                self.view.show_error(&format!("Error: {}", e.user_message()));
            }
        }
    }

    /// Shows a notification on this device so the user can check that
    /// delivery works. The only view call is the resulting alert.
    pub async fn send_test_notification(&self) {
        match self.push.permission_status() {
            PermissionStatus::Unsupported => self.view.notify(
                AlertLevel::Error,
                "This browser does not support notifications",
            ),
            PermissionStatus::Denied | PermissionStatus::Default => self
                .view
                .notify(AlertLevel::Warning, "Notifications are not enabled"),
            PermissionStatus::Granted => {
                match self.push.show_local(&LocalNotification::test()).await {
                    Ok(()) => {
                        tracing::info!("[ProfilePresenter] Test notification sent");
                        self.view.notify(AlertLevel::Info, "Test notification sent!");
                    }
                    Err(e) => {
                        tracing::error!("[ProfilePresenter] Test notification failed: {}", e);
                        self.view.show_error(&format!("Error: {}", e.user_message()));
                    }
                }
            }
        }
    }

    /// Clears the session and sends the user home.
    pub fn logout(&self) {
        if let Err(e) = self.session.clear_session() {
            tracing::error!("[ProfilePresenter] Logout failed: {}", e);
            self.view
                .show_error(&format!("Logout failed: {}", e.user_message()));
            return;
        }
        tracing::info!("[ProfilePresenter] Logged out");
        self.view.show_logged_out("You have been logged out");
        self.navigator
            .go_after(&self.token, self.redirect_delay, "/");
    }
}
