use super::ActivationSlot;
use crate::document::{AlertLevel, ScopedDocument};
use crate::page::{Page, PageContext, UiEvent};
use crate::presenter::{AuthPresenter, AuthView};
use crate::router::RouteParams;
use crate::services::AppServices;
use async_trait::async_trait;
use std::sync::Arc;
use story_core::error::Result;
use story_core::session::Credentials;

pub(crate) const LOGIN_FORM: &str = "login-form";

/// Auth feedback is shown as alerts plus a status line under the form.
pub(crate) struct AuthDocumentView {
    pub(crate) document: ScopedDocument,
    pub(crate) status_region: &'static str,
}

impl AuthView for AuthDocumentView {
    fn show_submitting(&self) {
        self.document.set_region(
            self.status_region,
            r#"<p class="form-status">Submitting...</p>"#,
        );
    }

    fn show_error(&self, message: &str) {
        self.document.set_region(self.status_region, String::new());
        self.document.alert(AlertLevel::Error, message);
    }

    fn show_success(&self, message: &str) {
        self.document.set_region(self.status_region, String::new());
        self.document.alert(AlertLevel::Success, message);
    }
}

/// Sign-in form at `/login`.
pub struct LoginPage {
    services: Arc<AppServices>,
    presenter: ActivationSlot<AuthPresenter>,
}

impl LoginPage {
    pub fn new(services: Arc<AppServices>) -> Self {
        Self {
            services,
            presenter: ActivationSlot::default(),
        }
    }
}

#[async_trait]
impl Page for LoginPage {
    fn name(&self) -> &'static str {
        "login"
    }

    fn render(&self, _params: &RouteParams) -> Result<String> {
        Ok(format!(
            r##"<section class="container auth-page">
  <div class="auth-container" id="main-content">
    <h1 class="page-title">Login</h1>
    <form id="{LOGIN_FORM}" class="auth-form">
      <label for="email">Email</label><input type="email" id="email" name="email" required>
      <label for="password">Password</label><input type="password" id="password" name="password" required>
      <button type="submit" class="btn btn-primary">Login</button>
    </form>
    <div id="login-status"></div>
    <p class="auth-link">Don't have an account? <a href="#/register">Register here</a></p>
  </div>
</section>"##
        ))
    }

    async fn activate(&self, ctx: PageContext) -> Result<()> {
        let view = Arc::new(AuthDocumentView {
            document: ctx.document.clone(),
            status_region: "login-status",
        });
        let presenter = Arc::new(AuthPresenter::new(
            view,
            self.services.api.clone(),
            self.services.session.clone(),
            ctx.navigator.clone(),
            ctx.token.clone(),
            &self.services.config,
        ));
        self.presenter.install(&ctx.token, presenter);
        Ok(())
    }

    async fn handle_event(&self, ctx: PageContext, event: UiEvent) -> Result<()> {
        let Some(presenter) = self.presenter.get(&ctx.token) else {
            return Ok(());
        };
        if event.target() != LOGIN_FORM {
            return Ok(());
        }

        let credentials = Credentials {
            email: event.value("email").unwrap_or_default().trim().to_string(),
            password: event.value("password").unwrap_or_default().to_string(),
        };
        presenter.login(&credentials).await;
        Ok(())
    }

    async fn deactivate(&self) -> Result<()> {
        self.presenter.take();
        Ok(())
    }
}
