use super::templates::{self, coordinates};
use super::{ActivationSlot, parse_coordinate};
use crate::document::ScopedDocument;
use crate::markup::escape;
use crate::page::{Page, PageContext, UiEvent};
use crate::presenter::{HomePresenter, HomeView};
use crate::router::RouteParams;
use crate::services::AppServices;
use async_trait::async_trait;
use std::sync::Arc;
use story_core::error::Result;
use story_core::story::{LatLon, Story};

/// Region ids written by the home view.
pub(crate) const STORY_LIST: &str = "story-list";
pub(crate) const MAP_MODAL: &str = "map-modal";
pub(crate) const LOCATION_INFO: &str = "location-info";

struct HomeDocumentView {
    document: ScopedDocument,
}

impl HomeView for HomeDocumentView {
    fn show_loading(&self) {
        self.document.set_region(STORY_LIST, templates::loading());
    }

    fn show_stories(&self, stories: &[Story]) {
        let markup: String = stories
            .iter()
            .map(|story| templates::story_item(story, ""))
            .collect();
        self.document.set_region(STORY_LIST, markup);
    }

    fn show_empty(&self) {
        self.document
            .set_region(STORY_LIST, templates::empty_message("No stories found"));
    }

    fn show_error(&self, message: &str) {
        self.document
            .set_region(STORY_LIST, templates::error_message(message));
    }

    fn open_map_modal(&self, story: &Story) {
        self.document.set_region(
            MAP_MODAL,
            format!(
                r#"<div class="modal show" data-id="{}"><h2>Story Location</h2></div>"#,
                escape(&story.id)
            ),
        );
        self.document.set_region(LOCATION_INFO, String::new());
    }

    fn show_map_ready(&self, story: &Story, at: LatLon) {
        self.document.set_region(
            LOCATION_INFO,
            format!(
                "<p>{}'s story at {}</p>",
                escape(&story.name),
                coordinates(at)
            ),
        );
    }

    fn show_map_error(&self, message: &str) {
        self.document
            .set_region(LOCATION_INFO, templates::error_message(message));
    }

    fn close_map_modal(&self) {
        self.document
            .set_region(MAP_MODAL, r#"<div class="modal"></div>"#);
        self.document.set_region(LOCATION_INFO, String::new());
    }
}

/// The story feed at `/`.
pub struct HomePage {
    services: Arc<AppServices>,
    presenter: ActivationSlot<HomePresenter>,
}

impl HomePage {
    pub fn new(services: Arc<AppServices>) -> Self {
        Self {
            services,
            presenter: ActivationSlot::default(),
        }
    }
}

#[async_trait]
impl Page for HomePage {
    fn name(&self) -> &'static str {
        "home"
    }

    fn render(&self, _params: &RouteParams) -> Result<String> {
        let greeting = match self.services.session.user() {
            Some(user) => format!("Signed in as {}", escape(&user.name)),
            None => "Browsing as guest".to_string(),
        };
        Ok(format!(
            r#"<section class="container home-page">
  <h1 class="page-title">Latest Stories</h1>
  <p class="session-greeting">{greeting}</p>
  <div id="main-content" class="story-list-container"><div id="{STORY_LIST}" class="story-list"></div></div>
  <div id="{MAP_MODAL}" class="modal">
    <span class="close-modal">&times;</span>
    <div id="story-map" class="story-map"></div>
    <div id="{LOCATION_INFO}"></div>
  </div>
</section>"#
        ))
    }

    async fn activate(&self, ctx: PageContext) -> Result<()> {
        let view = Arc::new(HomeDocumentView {
            document: ctx.document.clone(),
        });
        let presenter = Arc::new(HomePresenter::new(
            view,
            self.services.api.clone(),
            self.services.session.clone(),
            self.services.maps.clone(),
            ctx.token.clone(),
            &self.services.config,
        ));
        if !self.presenter.install(&ctx.token, presenter.clone()) {
            return Ok(());
        }

        presenter.load_stories().await;
        Ok(())
    }

    async fn handle_event(&self, ctx: PageContext, event: UiEvent) -> Result<()> {
        let Some(presenter) = self.presenter.get(&ctx.token) else {
            return Ok(());
        };

        match event.target() {
            "map-toggle-button" => {
                let Some(id) = event.filled("id") else {
                    tracing::warn!("[HomePage] Map button clicked without a story id");
                    return Ok(());
                };
                match (
                    parse_coordinate(event.value("lat")),
                    parse_coordinate(event.value("lon")),
                ) {
                    (Some(lat), Some(lon)) => presenter.show_story_map(id, lat, lon),
                    _ => tracing::warn!("[HomePage] Map button for {} has no coordinates", id),
                }
            }
            "close-modal" => presenter.close_map(),
            other => tracing::debug!("[HomePage] Ignoring event on '{}'", other),
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
