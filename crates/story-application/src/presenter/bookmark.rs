//! Bookmark list presenter.

use crate::lifecycle::{ActivationToken, lock};
use crate::markup::escape;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use story_core::bookmark::BookmarkRepository;
use story_core::config::AppConfig;
use story_core::map::{MapHandle, MapOptions, MapWidgetFactory, MarkerOptions};
use story_core::story::Story;

/// Element id of the inline map shown for a bookmarked story.
pub fn bookmark_map_container(story_id: &str) -> String {
    format!("map-{}", story_id)
}

pub trait BookmarkView: Send + Sync {
    fn show_loading(&self);
    fn show_empty(&self);
    /// Shows the saved stories, newest first, with their count.
    fn show_bookmarks(&self, stories: &[Story]);
    fn show_error(&self, message: &str);
    fn show_map_error(&self, story_id: &str, message: &str);
}

pub struct BookmarkPresenter {
    view: Arc<dyn BookmarkView>,
    bookmarks: Arc<dyn BookmarkRepository>,
    maps: Arc<dyn MapWidgetFactory>,
    token: ActivationToken,
    zoom: u8,
    map_delay: Duration,
    resize_delay: Duration,
    open_maps: Arc<Mutex<Vec<MapHandle>>>,
    /// Token of the inline-map batch for the list currently shown
    batch: Mutex<Option<ActivationToken>>,
}

impl BookmarkPresenter {
    pub fn new(
        view: Arc<dyn BookmarkView>,
        bookmarks: Arc<dyn BookmarkRepository>,
        maps: Arc<dyn MapWidgetFactory>,
        token: ActivationToken,
        config: &AppConfig,
    ) -> Self {
        Self {
            view,
            bookmarks,
            maps,
            token,
            zoom: config.map.bookmark_zoom,
            map_delay: config.timing.bookmark_map_delay(),
            resize_delay: config.timing.map_resize_delay(),
            open_maps: Arc::new(Mutex::new(Vec::new())),
            batch: Mutex::new(None),
        }
    }

    pub async fn load_bookmarks(&self) {
        self.view.show_loading();
        self.list().await;
    }

    /// Removes one bookmark and shows the remaining list.
    pub async fn remove_bookmark(&self, story_id: &str) {
        if let Err(e) = self.bookmarks.remove(story_id).await {
            tracing::error!("[BookmarkPresenter] Failed to remove {}: {}", story_id, e);
            self.view
                .show_error(&format!("Failed to remove bookmark: {}", e.user_message()));
            return;
        }
        tracing::info!("[BookmarkPresenter] Removed bookmark {}", story_id);
        self.list().await;
    }

    async fn list(&self) {
        self.dispose_maps();

        let mut stories = match self.bookmarks.get_all().await {
            Ok(stories) => stories,
            Err(e) => {
                tracing::error!("[BookmarkPresenter] Failed to load bookmarks: {}", e);
                self.view.show_error(&format!(
                    "Failed to load bookmarked stories: {}",
                    e.user_message()
                ));
                return;
            }
        };

        if stories.is_empty() {
            self.view.show_empty();
            return;
        }

        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.view.show_bookmarks(&stories);
        self.schedule_inline_maps(stories);
    }

    fn schedule_inline_maps(&self, stories: Vec<Story>) {
        let located: Vec<Story> = stories.into_iter().filter(Story::has_location).collect();
        if located.is_empty() {
            return;
        }

        let token = self.token.child();
        *lock(&self.batch) = Some(token.clone());

        let maps = self.maps.clone();
        let view = self.view.clone();
        let open = self.open_maps.clone();
        let zoom = self.zoom;
        let resize_delay = self.resize_delay;

        token.clone().defer(self.map_delay, move || async move {
            tracing::debug!("[BookmarkPresenter] Setting up {} inline maps", located.len());
            for story in &located {
                let Some(at) = story.location() else {
                    continue;
                };
                let container = bookmark_map_container(&story.id);
                let Some(handle) = maps.init(&container, MapOptions { center: at, zoom }) else {
                    tracing::warn!("[BookmarkPresenter] Failed to initialize map for {}", story.id);
                    view.show_map_error(&story.id, "Map could not be loaded");
                    continue;
                };
                maps.add_marker(
                    handle,
                    at,
                    MarkerOptions::titled(format!("{} location", story.name)).with_popup(format!(
                        "<strong>{}'s Story</strong><br><small>Coordinates: {:.4}, {:.4}</small>",
                        escape(&story.name),
                        at.lat,
                        at.lon
                    )),
                );
                if !token.is_live() {
                    maps.dispose(handle);
                    continue;
                }
                lock(&open).push(handle);

                let resize = maps.clone();
                token.defer(resize_delay, move || async move {
                    resize.invalidate_size(handle);
                });
            }
        });
    }

    /// Disposes every inline map.
    pub fn close(&self) {
        self.dispose_maps();
    }

    fn dispose_maps(&self) {
        if let Some(batch) = lock(&self.batch).take() {
            batch.invalidate();
        }
        let handles: Vec<MapHandle> = lock(&self.open_maps).drain(..).collect();
        for handle in handles {
            self.maps.dispose(handle);
        }
    }
}
