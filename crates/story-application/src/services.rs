//! The collaborators pages are built with.

use std::sync::Arc;
use story_core::api::StoryApi;
use story_core::bookmark::BookmarkRepository;
use story_core::config::AppConfig;
use story_core::map::MapWidgetFactory;
use story_core::push::PushNotificationManager;
use story_core::session::SessionStore;

/// Process-wide collaborators shared by every page.
#[derive(Clone)]
pub struct AppServices {
    pub api: Arc<dyn StoryApi>,
    pub session: Arc<dyn SessionStore>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
    pub maps: Arc<dyn MapWidgetFactory>,
    pub push: Arc<dyn PushNotificationManager>,
    pub config: AppConfig,
}
