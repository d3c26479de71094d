//! Story detail presenter: detail fetch, location map and bookmark toggling.

use super::home::STORY_MAP_CONTAINER;
use crate::lifecycle::{ActivationToken, lock};
use crate::markup::escape;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use story_core::api::StoryApi;
use story_core::bookmark::BookmarkRepository;
use story_core::config::AppConfig;
use story_core::map::{MapHandle, MapOptions, MapWidgetFactory, MarkerOptions};
use story_core::session::SessionStore;
use story_core::story::{Envelope, LatLon, Story};

pub trait StoryDetailView: Send + Sync {
    fn show_loading(&self);
    fn show_story_detail(&self, story: &Story);
    fn show_error(&self, message: &str);
    fn show_map_error(&self, message: &str);

    fn render_save_button(&self);
    fn render_remove_button(&self);

    fn bookmark_saved(&self, story: &Story);
    fn bookmark_removed(&self);
    fn bookmark_failed(&self, message: &str);
}

pub struct StoryDetailPresenter {
    story_id: String,
    view: Arc<dyn StoryDetailView>,
    api: Arc<dyn StoryApi>,
    session: Arc<dyn SessionStore>,
    bookmarks: Arc<dyn BookmarkRepository>,
    maps: Arc<dyn MapWidgetFactory>,
    token: ActivationToken,
    zoom: u8,
    map_delay: Duration,
    resize_delay: Duration,
    story: Mutex<Option<Story>>,
    map: Arc<Mutex<Option<MapHandle>>>,
}

impl StoryDetailPresenter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        story_id: impl Into<String>,
        view: Arc<dyn StoryDetailView>,
        api: Arc<dyn StoryApi>,
        session: Arc<dyn SessionStore>,
        bookmarks: Arc<dyn BookmarkRepository>,
        maps: Arc<dyn MapWidgetFactory>,
        token: ActivationToken,
        config: &AppConfig,
    ) -> Self {
        Self {
            story_id: story_id.into(),
            view,
            api,
            session,
            bookmarks,
            maps,
            token,
            zoom: config.map.story_zoom,
            map_delay: config.timing.detail_map_delay(),
            resize_delay: config.timing.map_resize_delay(),
            story: Mutex::new(None),
            map: Arc::new(Mutex::new(None)),
        }
    }

    pub fn story_id(&self) -> &str {
        &self.story_id
    }

    pub async fn load_story_detail(&self) {
        self.view.show_loading();

        let token = self.session.token();
        match self.api.get_story(token.as_deref(), &self.story_id).await {
            Ok(Envelope::Failure { message }) => self.view.show_error(&message),
            Ok(Envelope::Success { data: story, .. }) => {
                *lock(&self.story) = Some(story.clone());
                self.view.show_story_detail(&story);
                if let Some(at) = story.location() {
                    self.schedule_map(story, at);
                }
            }
            Err(e) => {
                tracing::error!(
                    "[StoryDetailPresenter] Failed to load story {}: {}",
                    self.story_id,
                    e
                );
                self.view
                    .show_error(&format!("Failed to load story: {}", e.user_message()));
            }
        }
    }

    fn schedule_map(&self, story: Story, at: LatLon) {
        let maps = self.maps.clone();
        let view = self.view.clone();
        let slot = self.map.clone();
        let token = self.token.clone();
        let options = MapOptions {
            center: at,
            zoom: self.zoom,
        };
        let resize_delay = self.resize_delay;

        self.token.defer(self.map_delay, move || async move {
            let Some(handle) = maps.init(STORY_MAP_CONTAINER, options) else {
                tracing::warn!(
                    "[StoryDetailPresenter] Map for story {} could not be created",
                    story.id
                );
                view.show_map_error("Could not load map");
                return;
            };
            maps.add_marker(
                handle,
                at,
                MarkerOptions::titled("Story location").with_popup(format!(
                    "<strong>{}'s story</strong><br>Location",
                    escape(&story.name)
                )),
            );

            if !token.is_live() {
                maps.dispose(handle);
                return;
            }
            if let Some(previous) = lock(&slot).replace(handle) {
                maps.dispose(previous);
            }

            let resize = maps.clone();
            token.defer(resize_delay, move || async move {
                resize.invalidate_size(handle);
            });
        });
    }

    /// Fetches the story again and stores it as a bookmark.
    pub async fn save_story(&self) {
        let token = self.session.token();
        let story = match self.api.get_story(token.as_deref(), &self.story_id).await {
            Ok(Envelope::Success { data, .. }) => data,
            Ok(Envelope::Failure { message }) => {
                self.view.bookmark_failed(&message);
                return;
            }
            Err(e) => {
                tracing::error!("[StoryDetailPresenter] Save failed: {}", e);
                self.view
                    .bookmark_failed(&format!("Failed to save story: {}", e.user_message()));
                return;
            }
        };

        match self.bookmarks.put(&story).await {
            Ok(()) => {
                tracing::info!("[StoryDetailPresenter] Bookmarked story {}", story.id);
                self.view.bookmark_saved(&story);
            }
            Err(e) => {
                tracing::error!("[StoryDetailPresenter] Save failed: {}", e);
                self.view
                    .bookmark_failed(&format!("Failed to save story: {}", e.user_message()));
            }
        }
    }

    pub async fn delete_story(&self) {
        match self.bookmarks.remove(&self.story_id).await {
            Ok(()) => {
                tracing::info!("[StoryDetailPresenter] Removed bookmark {}", self.story_id);
                self.view.bookmark_removed();
            }
            Err(e) => {
                tracing::error!("[StoryDetailPresenter] Remove failed: {}", e);
                self.view
                    .bookmark_failed(&format!("Failed to remove story: {}", e.user_message()));
            }
        }
    }

    /// Shows the remove button when the story is bookmarked, the save
    /// button otherwise.
    pub async fn refresh_bookmark_button(&self) {
        match self.bookmarks.get_by_id(&self.story_id).await {
            Ok(Some(_)) => self.view.render_remove_button(),
            Ok(None) => self.view.render_save_button(),
            Err(e) => {
                tracing::warn!(
                    "[StoryDetailPresenter] Bookmark lookup failed, offering save: {}",
                    e
                );
                self.view.render_save_button();
            }
        }
    }

    pub fn close(&self) {
        if let Some(handle) = lock(&self.map).take() {
            self.maps.dispose(handle);
        }
    }
}
