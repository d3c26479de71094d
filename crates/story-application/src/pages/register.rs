use super::ActivationSlot;
use super::login::AuthDocumentView;
use crate::page::{Page, PageContext, UiEvent};
use crate::presenter::AuthPresenter;
use crate::router::RouteParams;
use crate::services::AppServices;
use async_trait::async_trait;
use std::sync::Arc;
use story_core::error::Result;
use story_core::session::Registration;

pub(crate) const REGISTER_FORM: &str = "register-form";

/// Account creation form at `/register`.
pub struct RegisterPage {
    services: Arc<AppServices>,
    presenter: ActivationSlot<AuthPresenter>,
}

impl RegisterPage {
    pub fn new(services: Arc<AppServices>) -> Self {
        Self {
            services,
            presenter: ActivationSlot::default(),
        }
    }
}

#[async_trait]
impl Page for RegisterPage {
    fn name(&self) -> &'static str {
        "register"
    }

    fn render(&self, _params: &RouteParams) -> Result<String> {
        Ok(format!(
            r##"<section class="container auth-page">
  <div class="auth-container" id="main-content">
    <h1 class="page-title">Register</h1>
    <form id="{REGISTER_FORM}" class="auth-form">
      <label for="name">Name</label><input type="text" id="name" name="name" required>
      <label for="email">Email</label><input type="email" id="email" name="email" required>
      <label for="password">Password</label><input type="password" id="password" name="password" minlength="8" required>
      <label for="confirm-password">Confirm Password</label><input type="password" id="confirm-password" name="confirm-password" required>
      <button type="submit" class="btn btn-primary">Register</button>
    </form>
    <div id="register-status"></div>
    <p class="auth-link">Already have an account? <a href="#/login">Login here</a></p>
  </div>
</section>"##
        ))
    }

    async fn activate(&self, ctx: PageContext) -> Result<()> {
        let view = Arc::new(AuthDocumentView {
            document: ctx.document.clone(),
            status_region: "register-status",
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
        if event.target() != REGISTER_FORM {
            return Ok(());
        }

        let field = |name: &str| event.value(name).unwrap_or_default().to_string();
        let registration = Registration {
            name: field("name").trim().to_string(),
            email: field("email").trim().to_string(),
            password: field("password"),
        };
        presenter
            .register(&registration, &field("confirm-password"))
            .await;
        Ok(())
    }

    async fn deactivate(&self) -> Result<()> {
        self.presenter.take();
        Ok(())
    }
}
