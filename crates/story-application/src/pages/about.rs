use crate::page::{Page, PageContext};
use crate::router::RouteParams;
use async_trait::async_trait;
use story_core::error::Result;

pub struct AboutPage;

#[async_trait]
impl Page for AboutPage {
    fn name(&self) -> &'static str {
        "about"
    }

    fn render(&self, _params: &RouteParams) -> Result<String> {
        Ok(r##"<section class="container about-page" id="main-content">
  <h1 class="page-title">About Story Share</h1>
  <p>Story Share lets you post photo stories, pin them on a map and keep the ones you like for offline reading.</p>
  <ul>
    <li>Browse the latest stories and see where they were taken</li>
    <li>Share a story with a photo, signed in or as a guest</li>
    <li>Bookmark stories to read them without a connection</li>
  </ul>
  <a href="#/" class="btn btn-primary">Browse Stories</a>
</section>"##
            .to_string())
    }

    async fn activate(&self, _ctx: PageContext) -> Result<()> {
        Ok(())
    }
}
