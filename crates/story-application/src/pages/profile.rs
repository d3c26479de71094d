use super::ActivationSlot;
use super::templates;
use crate::document::{AlertLevel, ScopedDocument};
use crate::lifecycle::lock;
use crate::markup::escape;
use crate::page::{Page, PageContext, UiEvent};
use crate::presenter::{ProfilePresenter, ProfileView};
use crate::router::RouteParams;
use crate::services::AppServices;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use story_core::error::Result;
use story_core::session::SessionUser;

pub(crate) const PROFILE_INFO: &str = "profile-info";
pub(crate) const NOTIFICATION_STATUS: &str = "notification-status";
pub(crate) const NOTIFICATION_TOGGLE: &str = "toggle-notifications";
pub(crate) const NOTIFICATION_TEST: &str = "test-notification";

struct ProfileDocumentView {
    document: ScopedDocument,
    last_status: Mutex<Option<bool>>,
}

impl ProfileDocumentView {
    fn render_status(&self, subscribed: bool) {
        let (status, button) = if subscribed {
            (
                r#"<p class="status-text success">You are subscribed to push notifications</p>"#,
                r#"<button id="toggle-notifications" class="btn btn-warning">Unsubscribe</button>"#,
            )
        } else {
            (
                r#"<p class="status-text">Get notified when new stories are created</p>"#,
                r#"<button id="toggle-notifications" class="btn btn-primary">Subscribe to Notifications</button>"#,
            )
        };
        self.document.set_region(NOTIFICATION_STATUS, status);
        self.document.set_region(NOTIFICATION_TOGGLE, button);
        // Test button only while subscribed
        let test = if subscribed {
            r#"<button id="test-notification" class="btn btn-secondary">Test Notification</button>"#
        } else {
            ""
        };
        self.document.set_region(NOTIFICATION_TEST, test);
    }
}

impl ProfileView for ProfileDocumentView {
    fn prompt_sign_in(&self) {
        self.document.set_region(
            PROFILE_INFO,
            templates::error_message("Please sign in to view your profile"),
        );
        self.document
            .alert(AlertLevel::Info, "Please sign in to view your profile");
    }

    fn show_profile(&self, user: &SessionUser) {
        self.document.set_region(
            PROFILE_INFO,
            format!(
                r#"<h2 class="profile-name">{}</h2><p class="profile-id">ID: {}</p>"#,
                escape(&user.name),
                escape(&user.id)
            ),
        );
    }

    fn show_notification_busy(&self) {
        self.document.set_region(
            NOTIFICATION_TOGGLE,
            r#"<button id="toggle-notifications" class="btn btn-primary" disabled>Processing...</button>"#,
        );
    }

    fn show_notification_status(&self, subscribed: bool) {
        *lock(&self.last_status) = Some(subscribed);
        self.render_status(subscribed);
    }

    fn show_notification_unavailable(&self, message: &str) {
        self.document.set_region(
            NOTIFICATION_STATUS,
            format!(r#"<p class="status-text error">{}</p>"#, escape(message)),
        );
        self.document.set_region(NOTIFICATION_TOGGLE, String::new());
        self.document.set_region(NOTIFICATION_TEST, String::new());
    }

    fn show_logged_out(&self, message: &str) {
        self.document.alert(AlertLevel::Info, message);
    }

    fn show_error(&self, message: &str) {
        self.document.alert(AlertLevel::Error, message);
        // Give the toggle back in whatever state it was before
        let last = *lock(&self.last_status);
        if let Some(subscribed) = last {
            self.render_status(subscribed);
        }
    }

    fn notify(&self, level: AlertLevel, message: &str) {
        self.document.alert(level, message);
    }
}

/// Account details and notification settings at `/profile`.
pub struct ProfilePage {
    services: Arc<AppServices>,
    presenter: ActivationSlot<ProfilePresenter>,
}

impl ProfilePage {
    pub fn new(services: Arc<AppServices>) -> Self {
        Self {
            services,
            presenter: ActivationSlot::default(),
        }
    }
}

#[async_trait]
impl Page for ProfilePage {
    fn name(&self) -> &'static str {
        "profile"
    }

    fn render(&self, _params: &RouteParams) -> Result<String> {
        Ok(format!(
            r#"<section class="container profile-page" id="main-content">
  <h1 class="page-title">Your Profile</h1>
  <div id="{PROFILE_INFO}" class="profile-info"></div>
  <h2>Notifications</h2>
  <div id="{NOTIFICATION_STATUS}" class="notification-status"><p>Checking notification status...</p></div>
  <div id="{NOTIFICATION_TOGGLE}"></div>
  <div id="{NOTIFICATION_TEST}"></div>
  <h2>Account Settings</h2>
  <button id="logout-button" class="btn btn-danger">Logout</button>
</section>"#
        ))
    }

    async fn activate(&self, ctx: PageContext) -> Result<()> {
        let view = Arc::new(ProfileDocumentView {
            document: ctx.document.clone(),
            last_status: Mutex::new(None),
        });
        let presenter = Arc::new(ProfilePresenter::new(
            view,
            self.services.session.clone(),
            self.services.push.clone(),
            ctx.navigator.clone(),
            ctx.token.clone(),
            &self.services.config,
        ));
        if !self.presenter.install(&ctx.token, presenter.clone()) {
            return Ok(());
        }

        if !presenter.load_profile() {
            ctx.navigator.go("/login");
            return Ok(());
        }
        presenter.load_notification_status().await;
        Ok(())
    }

    async fn handle_event(&self, ctx: PageContext, event: UiEvent) -> Result<()> {
        let Some(presenter) = self.presenter.get(&ctx.token) else {
            return Ok(());
        };

        match event.target() {
            NOTIFICATION_TOGGLE => presenter.toggle_notifications().await,
            NOTIFICATION_TEST => presenter.send_test_notification().await,
            "logout-button" => presenter.logout(),
            other => tracing::debug!("[ProfilePage] Ignoring event on '{}'", other),
        }
        Ok(())
    }

    async fn deactivate(&self) -> Result<()> {
        self.presenter.take();
        Ok(())
    }
}
