use super::templates::{self, coordinates};
use super::{ActivationSlot, parse_coordinate};
use crate::document::{AlertLevel, ScopedDocument};
use crate::lifecycle::lock;
use crate::markup::escape;
use crate::page::{Page, PageContext, UiEvent};
use crate::presenter::{AddStoryPresenter, AddStoryView};
use crate::router::RouteParams;
use crate::services::AppServices;
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use story_core::error::Result;
use story_core::map::{MapHandle, MapOptions, MarkerOptions};
use story_core::story::{LatLon, Photo};
use story_infrastructure::photo::load_photo;

pub(crate) const ADD_STORY_FORM: &str = "add-story-form";
pub(crate) const LOCATION_MAP: &str = "location-map";
pub(crate) const PHOTO_UPLOAD: &str = "photo-upload";
pub(crate) const SNAPSHOT: &str = "snapshot-container";
pub(crate) const SELECTED_LOCATION: &str = "selected-location";
pub(crate) const FORM_STATUS: &str = "add-story-status";

struct AddStoryDocumentView {
    document: ScopedDocument,
}

impl AddStoryView for AddStoryDocumentView {
    fn show_submitting(&self) {
        self.document.set_region(
            FORM_STATUS,
            r#"<p class="form-status">Sharing your story...</p>"#,
        );
    }

    fn show_error(&self, message: &str) {
        self.document.set_region(FORM_STATUS, String::new());
        self.document.alert(AlertLevel::Error, message);
    }

    fn show_success(&self, message: &str) {
        self.document.set_region(FORM_STATUS, String::new());
        self.document.alert(AlertLevel::Success, message);
    }

    fn show_photo(&self, photo: &Photo) {
        self.document.set_region(
            SNAPSHOT,
            format!(
                r#"<p class="snapshot">{} ({}, {} bytes)</p>"#,
                escape(&photo.file_name),
                escape(&photo.mime_type),
                photo.bytes.len()
            ),
        );
    }

    fn show_location(&self, at: LatLon) {
        self.document.set_region(
            SELECTED_LOCATION,
            format!("<p>Selected location: {}</p>", coordinates(at)),
        );
    }
}

struct Composer {
    presenter: Arc<AddStoryPresenter>,
    map: Mutex<Option<MapHandle>>,
}

/// New story form at `/add`.
///
/// The photo comes from a file picked through the upload control; the
/// location is pinned by clicking the location map.
pub struct AddStoryPage {
    services: Arc<AppServices>,
    composer: ActivationSlot<Composer>,
}

impl AddStoryPage {
    pub fn new(services: Arc<AppServices>) -> Self {
        Self {
            services,
            composer: ActivationSlot::default(),
        }
    }

    fn pin(&self, composer: &Composer, lat: f64, lon: f64) {
        composer.presenter.select_location(lat, lon);
        let Some(at) = composer.presenter.location() else {
            return;
        };
        if let Some(handle) = *lock(&composer.map) {
            self.services
                .maps
                .add_marker(handle, at, MarkerOptions::titled("Selected location"));
        }
    }
}

#[async_trait]
impl Page for AddStoryPage {
    fn name(&self) -> &'static str {
        "add-story"
    }

    fn render(&self, _params: &RouteParams) -> Result<String> {
        let mode = if self.services.session.token().is_some() {
            "Your story will be posted to your account."
        } else {
            "You are not signed in; your story will be posted as a guest."
        };
        Ok(format!(
            r#"<section class="container add-story-page" id="main-content">
  <h1 class="page-title">Share Your Story</h1>
  <p class="submission-mode">{mode}</p>
  <form id="{ADD_STORY_FORM}" class="add-story-form">
    <label for="description">Description</label>
    <textarea id="description" name="description" rows="4" required></textarea>
    <label for="{PHOTO_UPLOAD}">Photo</label>
    <input type="file" id="{PHOTO_UPLOAD}" name="photo" accept="image/*">
    <div id="{SNAPSHOT}" class="snapshot-container"></div>
    <label for="location">Location</label>
    <div id="{LOCATION_MAP}" class="location-map"></div>
    <p class="map-instructions">Click on the map to set your location.</p>
    <div id="{SELECTED_LOCATION}" class="selected-location"></div>
    <button type="submit" id="submit-story" class="btn btn-primary">Share Story</button>
  </form>
  <div id="{FORM_STATUS}"></div>
</section>"#
        ))
    }

    async fn activate(&self, ctx: PageContext) -> Result<()> {
        let view = Arc::new(AddStoryDocumentView {
            document: ctx.document.clone(),
        });
        let presenter = Arc::new(AddStoryPresenter::new(
            view,
            self.services.api.clone(),
            self.services.session.clone(),
            ctx.navigator.clone(),
            ctx.token.clone(),
            &self.services.config,
        ));

        let map_settings = &self.services.config.map;
        let map = self.services.maps.init(
            LOCATION_MAP,
            MapOptions {
                center: map_settings.default_center,
                zoom: map_settings.default_zoom,
            },
        );
        if map.is_none() {
            ctx.document.set_region(
                LOCATION_MAP,
                templates::error_message("Map could not be loaded"),
            );
        }

        let composer = Arc::new(Composer {
            presenter,
            map: Mutex::new(map),
        });
        if !self.composer.install(&ctx.token, composer) {
            if let Some(handle) = map {
                self.services.maps.dispose(handle);
            }
        }
        Ok(())
    }

    async fn handle_event(&self, ctx: PageContext, event: UiEvent) -> Result<()> {
        let Some(composer) = self.composer.get(&ctx.token) else {
            return Ok(());
        };

        match event.target() {
            PHOTO_UPLOAD => {
                let Some(path) = event.filled("path") else {
                    tracing::warn!("[AddStoryPage] Upload event without a file path");
                    return Ok(());
                };
                match load_photo(Path::new(path)).await {
                    Ok(photo) => composer.presenter.select_photo(photo),
                    Err(e) => composer.presenter.reject_photo(&e),
                }
            }
            LOCATION_MAP => match (
                parse_coordinate(event.value("lat")),
                parse_coordinate(event.value("lon")),
            ) {
                (Some(lat), Some(lon)) => self.pin(&composer, lat, lon),
                _ => tracing::warn!("[AddStoryPage] Map click without coordinates"),
            },
            ADD_STORY_FORM => {
                let description = event.value("description").unwrap_or_default();
                composer.presenter.submit(description).await;
            }
            other => tracing::debug!("[AddStoryPage] Ignoring event on '{}'", other),
        }
        Ok(())
    }

    async fn deactivate(&self) -> Result<()> {
        if let Some(composer) = self.composer.take() {
            if let Some(handle) = lock(&composer.map).take() {
                self.services.maps.dispose(handle);
            }
        }
        Ok(())
    }
}
