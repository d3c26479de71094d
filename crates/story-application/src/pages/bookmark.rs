use super::ActivationSlot;
use super::templates;
use crate::document::ScopedDocument;
use crate::markup::escape;
use crate::page::{Page, PageContext, UiEvent};
use crate::presenter::{BookmarkPresenter, BookmarkView, bookmark_map_container};
use crate::router::RouteParams;
use crate::services::AppServices;
use async_trait::async_trait;
use std::sync::Arc;
use story_core::error::Result;
use story_core::story::Story;

pub(crate) const BOOKMARK_LIST: &str = "bookmark-list";
pub(crate) const BOOKMARK_COUNT: &str = "bookmark-count";

struct BookmarkDocumentView {
    document: ScopedDocument,
}

impl BookmarkView for BookmarkDocumentView {
    fn show_loading(&self) {
        self.document.set_region(BOOKMARK_LIST, templates::loading());
    }

    fn show_empty(&self) {
        self.document.set_region(BOOKMARK_COUNT, String::new());
        self.document.set_region(
            BOOKMARK_LIST,
            r##"<div class="empty-message"><h3>No bookmarked stories yet</h3><p>Stories you bookmark will appear here</p><a href="#/" class="btn btn-primary">Browse Stories</a></div>"##,
        );
    }

    fn show_bookmarks(&self, stories: &[Story]) {
        let markup: String = stories
            .iter()
            .map(|story| {
                let mut footer = format!(
                    r#"<button class="bookmark-remove" data-id="{}">Remove</button>"#,
                    escape(&story.id)
                );
                if story.has_location() {
                    footer.push_str(&format!(
                        r#"<div id="{}" class="story-map-container"></div>"#,
                        escape(&bookmark_map_container(&story.id))
                    ));
                }
                templates::story_item(story, &footer)
            })
            .collect();
        self.document.set_region(BOOKMARK_LIST, markup);

        let noun = if stories.len() == 1 { "story" } else { "stories" };
        self.document.set_region(
            BOOKMARK_COUNT,
            format!(
                r#"<p class="bookmark-count">{} {} bookmarked</p>"#,
                stories.len(),
                noun
            ),
        );
    }

    fn show_error(&self, message: &str) {
        self.document
            .set_region(BOOKMARK_LIST, templates::error_message(message));
    }

    fn show_map_error(&self, story_id: &str, message: &str) {
        self.document.set_region(
            &bookmark_map_container(story_id),
            templates::error_message(message),
        );
    }
}

/// Saved stories at `/bookmark`.
pub struct BookmarkPage {
    services: Arc<AppServices>,
    presenter: ActivationSlot<BookmarkPresenter>,
}

impl BookmarkPage {
    pub fn new(services: Arc<AppServices>) -> Self {
        Self {
            services,
            presenter: ActivationSlot::default(),
        }
    }
}

#[async_trait]
impl Page for BookmarkPage {
    fn name(&self) -> &'static str {
        "bookmark"
    }

    fn render(&self, _params: &RouteParams) -> Result<String> {
        Ok(format!(
            r#"<section class="container bookmark-page">
  <div class="bookmark-title-container"><h1 class="page-title">Bookmarked Stories</h1><div id="{BOOKMARK_COUNT}"></div></div>
  <div id="bookmark-content" class="story-list-container"><div id="{BOOKMARK_LIST}" class="story-list"></div></div>
</section>"#
        ))
    }

    async fn activate(&self, ctx: PageContext) -> Result<()> {
        let view = Arc::new(BookmarkDocumentView {
            document: ctx.document.clone(),
        });
        let presenter = Arc::new(BookmarkPresenter::new(
            view,
            self.services.bookmarks.clone(),
            self.services.maps.clone(),
            ctx.token.clone(),
            &self.services.config,
        ));
        if !self.presenter.install(&ctx.token, presenter.clone()) {
            return Ok(());
        }

        presenter.load_bookmarks().await;
        Ok(())
    }

    async fn handle_event(&self, ctx: PageContext, event: UiEvent) -> Result<()> {
        let Some(presenter) = self.presenter.get(&ctx.token) else {
            return Ok(());
        };

        match (event.target(), event.filled("id")) {
            ("bookmark-remove", Some(id)) => presenter.remove_bookmark(id).await,
            (other, _) => tracing::debug!("[BookmarkPage] Ignoring event on '{}'", other),
        }
        Ok(())
    }

    async fn deactivate(&self) -> Result<()> {
        if let Some(presenter) = self.presenter.take() {
            presenter.close();
        }
        Ok(())
    }
}
