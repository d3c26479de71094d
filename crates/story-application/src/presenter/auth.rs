//! Login and registration presenter.

use crate::lifecycle::ActivationToken;
use crate::navigator::Navigator;
use std::sync::Arc;
use std::time::Duration;
use story_core::api::StoryApi;
use story_core::config::AppConfig;
use story_core::session::{Credentials, Registration, SessionStore};
use story_core::story::Envelope;

pub trait AuthView: Send + Sync {
    /// Disables the form while the request is in flight.
    fn show_submitting(&self);
    fn show_error(&self, message: &str);
    fn show_success(&self, message: &str);
}

pub struct AuthPresenter {
    view: Arc<dyn AuthView>,
    api: Arc<dyn StoryApi>,
    session: Arc<dyn SessionStore>,
    navigator: Navigator,
    token: ActivationToken,
    redirect_delay: Duration,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl AuthPresenter {
    pub fn new(
        view: Arc<dyn AuthView>,
        api: Arc<dyn StoryApi>,
        session: Arc<dyn SessionStore>,
        navigator: Navigator,
        token: ActivationToken,
        config: &AppConfig,
    ) -> Self {
        Self {
            view,
            api,
            session,
            navigator,
            token,
            redirect_delay: config.timing.redirect_delay(),
        }
    }

    /// Signs in and stores the session; redirects home on success.
    pub async fn login(&self, credentials: &Credentials) {
        if blank(&credentials.email) || blank(&credentials.password) {
            self.view.show_error("Please fill in all fields");
            return;
        }

        self.view.show_submitting();
        match self.api.login(credentials).await {
            Ok(Envelope::Failure { message }) => self.view.show_error(&message),
            Ok(Envelope::Success { data: session, .. }) => {
                let name = session.user.name.clone();
                if let Err(e) = self.session.set_session(session) {
                    tracing::error!("[AuthPresenter] Failed to store session: {}", e);
                    self.view
                        .show_error(&format!("Login failed: {}", e.user_message()));
                    return;
                }
                tracing::info!("[AuthPresenter] Signed in as {}", name);
                self.view.show_success("Login successful! Redirecting...");
                self.navigator.go_after(&self.token, self.redirect_delay, "/");
            }
            Err(e) => {
                tracing::error!("[AuthPresenter] Login request failed: {}", e);
                self.view
                    .show_error(&format!("Login failed: {}", e.user_message()));
            }
        }
    }

    /// Creates an account; redirects to the login page on success.
    pub async fn register(&self, registration: &Registration, confirm_password: &str) {
        if blank(&registration.name)
            || blank(&registration.email)
            || blank(&registration.password)
            || blank(confirm_password)
        {
            self.view.show_error("Please fill in all fields");
            return;
        }
        if registration.password != confirm_password {
            self.view.show_error("Passwords do not match");
            return;
        }

        self.view.show_submitting();
        match self.api.register(registration).await {
            Ok(Envelope::Failure { message }) => self.view.show_error(&message),
            Ok(Envelope::Success { .. }) => {
                tracing::info!("[AuthPresenter] Registered {}", registration.email);
                self.view
                    .show_success("Registration successful! Please login.");
                self.navigator
                    .go_after(&self.token, self.redirect_delay, "/login");
            }
            Err(e) => {
                tracing::error!("[AuthPresenter] Registration request failed: {}", e);
                self.view
                    .show_error(&format!("Registration failed: {}", e.user_message()));
            }
        }
    }
}
