use crate::page::{Page, PageContext};
use crate::router::RouteParams;
use async_trait::async_trait;
use story_core::error::Result;

/// Fallback for locations no route claims.
pub struct NotFoundPage;

#[async_trait]
impl Page for NotFoundPage {
    fn name(&self) -> &'static str {
        "not-found"
    }

    fn render(&self, _params: &RouteParams) -> Result<String> {
        Ok(r##"<section class="container error-container">
  <h1 class="error-title">404</h1>
  <h2 class="error-subtitle">Page Not Found</h2>
  <p class="error-description">The page you are looking for does not exist or has been moved.</p>
  <a href="#/" class="btn btn-primary">Back to Home</a>
</section>"##
            .to_string())
    }

    async fn activate(&self, _ctx: PageContext) -> Result<()> {
        tracing::info!("[NotFoundPage] Page not found");
        Ok(())
    }
}
