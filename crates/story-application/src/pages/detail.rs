use super::ActivationSlot;
use super::templates::{self, coordinates};
use crate::document::{AlertLevel, ScopedDocument};
use crate::markup::escape;
use crate::page::{Page, PageContext, UiEvent};
use crate::presenter::{STORY_MAP_CONTAINER, StoryDetailPresenter, StoryDetailView};
use crate::router::RouteParams;
use crate::services::AppServices;
use async_trait::async_trait;
use std::sync::Arc;
use story_core::error::Result;
use story_core::story::{Story, format_story_date};

pub(crate) const STORY_DETAIL: &str = "story-detail";
pub(crate) const BUTTON_CONTAINER: &str = "button-container";

struct DetailDocumentView {
    document: ScopedDocument,
}

impl StoryDetailView for DetailDocumentView {
    fn show_loading(&self) {
        self.document.set_region(STORY_DETAIL, templates::loading());
    }

    fn show_story_detail(&self, story: &Story) {
        let name = escape(&story.name);
        let location = match story.location() {
            Some(at) => format!(
                r#"<div class="story-location"><h3>Location</h3><div id="{map}" class="story-detail-map"></div><p class="location-coordinates">Coordinates: {coords}</p></div>"#,
                map = STORY_MAP_CONTAINER,
                coords = coordinates(at)
            ),
            None => String::new(),
        };
        self.document.set_region(
            STORY_DETAIL,
            format!(
                r##"<div class="story-header">
  <a href="#/" class="back-button">Back to Stories</a>
  <h1 class="story-title">Story by {name}</h1>
  <div id="{BUTTON_CONTAINER}"></div>
</div>
<div class="story-content">
  <img src="{photo}" alt="Story image from {name}" class="story-detail-image">
  <p class="story-date">{date}</p>
  <p class="story-detail-description">{description}</p>
  {location}
</div>"##,
                photo = escape(&story.photo_url),
                date = format_story_date(&story.created_at),
                description = escape(&story.description),
            ),
        );
    }

    fn show_error(&self, message: &str) {
        self.document
            .set_region(STORY_DETAIL, templates::error_message(message));
    }

    fn show_map_error(&self, message: &str) {
        self.document
            .set_region(STORY_MAP_CONTAINER, templates::error_message(message));
    }

    fn render_save_button(&self) {
        self.document.set_region(
            BUTTON_CONTAINER,
            r#"<button id="story-detail-save" class="btn btn-transparent">Save story</button>"#,
        );
    }

    fn render_remove_button(&self) {
        self.document.set_region(
            BUTTON_CONTAINER,
            r#"<button id="story-detail-remove" class="btn btn-transparent">Remove story</button>"#,
        );
    }

    fn bookmark_saved(&self, story: &Story) {
        self.document.alert(
            AlertLevel::Success,
            &format!("{}'s story saved to bookmarks", story.name),
        );
    }

    fn bookmark_removed(&self) {
        self.document
            .alert(AlertLevel::Info, "Story removed from bookmarks");
    }

    fn bookmark_failed(&self, message: &str) {
        self.document.alert(AlertLevel::Error, message);
    }
}

/// A single story at `/story/:id`.
pub struct StoryDetailPage {
    services: Arc<AppServices>,
    presenter: ActivationSlot<StoryDetailPresenter>,
}

impl StoryDetailPage {
    pub fn new(services: Arc<AppServices>) -> Self {
        Self {
            services,
            presenter: ActivationSlot::default(),
        }
    }
}

#[async_trait]
impl Page for StoryDetailPage {
    fn name(&self) -> &'static str {
        "story-detail"
    }

    fn render(&self, _params: &RouteParams) -> Result<String> {
        Ok(format!(
            r#"<section class="container detail-page"><div id="{STORY_DETAIL}" class="story-detail"></div></section>"#
        ))
    }

    async fn activate(&self, ctx: PageContext) -> Result<()> {
        let Some(id) = ctx.param("id").map(str::to_string) else {
            ctx.document
                .set_region(STORY_DETAIL, templates::error_message("Story not found"));
            return Ok(());
        };

        let view = Arc::new(DetailDocumentView {
            document: ctx.document.clone(),
        });
        let presenter = Arc::new(StoryDetailPresenter::new(
            id,
            view,
            self.services.api.clone(),
            self.services.session.clone(),
            self.services.bookmarks.clone(),
            self.services.maps.clone(),
            ctx.token.clone(),
            &self.services.config,
        ));
        if !self.presenter.install(&ctx.token, presenter.clone()) {
            return Ok(());
        }

        presenter.load_story_detail().await;
        presenter.refresh_bookmark_button().await;
        Ok(())
    }

    async fn handle_event(&self, ctx: PageContext, event: UiEvent) -> Result<()> {
        let Some(presenter) = self.presenter.get(&ctx.token) else {
            return Ok(());
        };

        match event.target() {
            "story-detail-save" => {
                presenter.save_story().await;
                presenter.refresh_bookmark_button().await;
            }
            "story-detail-remove" => {
                presenter.delete_story().await;
                presenter.refresh_bookmark_button().await;
            }
            other => tracing::debug!("[StoryDetailPage] Ignoring event on '{}'", other),
        }
        Ok(())
    }

    async fn deactivate(&self) -> Result<()> {
        if let Some(presenter) = self.presenter.take() {
            tracing::debug!("[StoryDetailPage] Releasing story {}", presenter.story_id());
            presenter.close();
        }
        Ok(())
    }
}
