//! Home feed presenter.

use crate::lifecycle::{ActivationToken, lock};
use crate::markup::escape;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use story_core::api::StoryApi;
use story_core::config::AppConfig;
use story_core::map::{MapHandle, MapOptions, MapWidgetFactory, MarkerOptions};
use story_core::session::SessionStore;
use story_core::story::{Envelope, LatLon, Story, StoryQuery};

/// Element id of the map inside the story location modal.
pub const STORY_MAP_CONTAINER: &str = "story-map";

pub trait HomeView: Send + Sync {
    fn show_loading(&self);
    fn show_stories(&self, stories: &[Story]);
    fn show_empty(&self);
    fn show_error(&self, message: &str);

    /// Makes the map modal visible so its container can host a map.
    fn open_map_modal(&self, story: &Story);
    fn show_map_ready(&self, story: &Story, at: LatLon);
    fn show_map_error(&self, message: &str);
    fn close_map_modal(&self);
}

pub struct HomePresenter {
    view: Arc<dyn HomeView>,
    api: Arc<dyn StoryApi>,
    session: Arc<dyn SessionStore>,
    maps: Arc<dyn MapWidgetFactory>,
    token: ActivationToken,
    zoom: u8,
    resize_delay: Duration,
    stories: Mutex<Vec<Story>>,
    map: Mutex<Option<MapHandle>>,
}

impl HomePresenter {
    pub fn new(
        view: Arc<dyn HomeView>,
        api: Arc<dyn StoryApi>,
        session: Arc<dyn SessionStore>,
        maps: Arc<dyn MapWidgetFactory>,
        token: ActivationToken,
        config: &AppConfig,
    ) -> Self {
        Self {
            view,
            api,
            session,
            maps,
            token,
            zoom: config.map.story_zoom,
            resize_delay: config.timing.map_resize_delay(),
            stories: Mutex::new(Vec::new()),
            map: Mutex::new(None),
        }
    }

    /// Fetches the feed, as a guest when nobody is signed in.
    pub async fn load_stories(&self) {
        self.view.show_loading();

        let token = self.session.token();
        tracing::debug!(
            "[HomePresenter] Loading stories ({})",
            if token.is_some() { "authenticated" } else { "guest" }
        );

        match self
            .api
            .get_stories(token.as_deref(), &StoryQuery::with_location())
            .await
        {
            Ok(Envelope::Failure { message }) => self.view.show_error(&message),
            Ok(Envelope::Success { data, .. }) if data.is_empty() => {
                lock(&self.stories).clear();
                self.view.show_empty();
            }
            Ok(Envelope::Success { data, .. }) => {
                *lock(&self.stories) = data.clone();
                self.view.show_stories(&data);
            }
            Err(e) => {
                tracing::error!("[HomePresenter] Failed to load stories: {}", e);
                self.view
                    .show_error(&format!("Failed to load stories: {}", e.user_message()));
            }
        }
    }

    /// Stories from the last successful fetch.
    pub fn stories(&self) -> Vec<Story> {
        lock(&self.stories).clone()
    }

    /// Opens the location modal for a fetched story.
    pub fn show_story_map(&self, story_id: &str, lat: f64, lon: f64) {
        let story = lock(&self.stories)
            .iter()
            .find(|s| s.id == story_id)
            .cloned();
        let Some(story) = story else {
            self.view.show_error("Story not found");
            return;
        };

        self.view.open_map_modal(&story);
        self.dispose_map();

        let at = LatLon::new(lat, lon);
        let options = MapOptions {
            center: at,
            zoom: self.zoom,
        };
        let Some(handle) = self.maps.init(STORY_MAP_CONTAINER, options) else {
            self.view.show_map_error("Failed to initialize map");
            return;
        };

        self.maps.add_marker(
            handle,
            at,
            MarkerOptions::titled("Story location").with_popup(format!(
                "<strong>{}'s story</strong><br>Location",
                escape(&story.name)
            )),
        );
        *lock(&self.map) = Some(handle);

        let maps = self.maps.clone();
        self.token.defer(self.resize_delay, move || async move {
            maps.invalidate_size(handle);
        });

        self.view.show_map_ready(&story, at);
    }

    pub fn close_map(&self) {
        self.dispose_map();
        self.view.close_map_modal();
    }

    /// Releases the open map, if any. Safe to call repeatedly.
    pub fn close(&self) {
        self.dispose_map();
    }

    fn dispose_map(&self) {
        if let Some(handle) = lock(&self.map).take() {
            self.maps.dispose(handle);
        }
    }
}
