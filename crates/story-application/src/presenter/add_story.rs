//! New story presenter.

use crate::lifecycle::{ActivationToken, lock};
use crate::navigator::Navigator;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use story_core::api::StoryApi;
use story_core::config::AppConfig;
use story_core::error::StoryError;
use story_core::session::SessionStore;
use story_core::story::{Envelope, LatLon, NewStory, Photo};

pub trait AddStoryView: Send + Sync {
    fn show_submitting(&self);
    fn show_error(&self, message: &str);
    fn show_success(&self, message: &str);
    fn show_photo(&self, photo: &Photo);
    fn show_location(&self, at: LatLon);
}

#[derive(Default)]
struct Draft {
    photo: Option<Photo>,
    location: Option<LatLon>,
}

pub struct AddStoryPresenter {
    view: Arc<dyn AddStoryView>,
    api: Arc<dyn StoryApi>,
    session: Arc<dyn SessionStore>,
    navigator: Navigator,
    token: ActivationToken,
    redirect_delay: Duration,
    draft: Mutex<Draft>,
}

impl AddStoryPresenter {
    pub fn new(
        view: Arc<dyn AddStoryView>,
        api: Arc<dyn StoryApi>,
        session: Arc<dyn SessionStore>,
        navigator: Navigator,
        token: ActivationToken,
        config: &AppConfig,
    ) -> Self {
        Self {
            view,
            api,
            session,
            navigator,
            token,
            redirect_delay: config.timing.redirect_delay(),
            draft: Mutex::new(Draft::default()),
        }
    }

    pub fn select_photo(&self, photo: Photo) {
        self.view.show_photo(&photo);
        lock(&self.draft).photo = Some(photo);
    }

    /// Reports a photo that could not be read.
    pub fn reject_photo(&self, error: &StoryError) {
        tracing::warn!("[AddStoryPresenter] Photo rejected: {}", error);
        self.view.show_error(&error.user_message());
    }

    /// Pins the story location.
    pub fn select_location(&self, lat: f64, lon: f64) {
        let at = LatLon::new(lat, lon);
        if !at.is_valid() {
            self.view.show_error("Invalid location");
            return;
        }
        lock(&self.draft).location = Some(at);
        self.view.show_location(at);
    }

    pub fn location(&self) -> Option<LatLon> {
        lock(&self.draft).location
    }

    pub fn has_photo(&self) -> bool {
        lock(&self.draft).photo.is_some()
    }

    /// Shares the story, as a guest when nobody is signed in.
    pub async fn submit(&self, description: &str) {
        let description = description.trim();
        if description.is_empty() {
            self.view.show_error("Please enter a description");
            return;
        }

        let (photo, location) = {
            let draft = lock(&self.draft);
            (draft.photo.clone(), draft.location)
        };
        let Some(photo) = photo else {
            self.view.show_error("Please take or upload a photo");
            return;
        };

        self.view.show_submitting();
        let story = NewStory::new(description, photo).at(location);
        let token = self.session.token();

        match self.api.add_story(token.as_deref(), &story).await {
            Ok(Envelope::Failure { message }) => self.view.show_error(&message),
            Ok(Envelope::Success { .. }) => {
                tracing::info!(
                    "[AddStoryPresenter] Story shared ({})",
                    if token.is_some() { "authenticated" } else { "guest" }
                );
                *lock(&self.draft) = Draft::default();
                self.view.show_success("Story shared successfully!");
                self.navigator.go_after(&self.token, self.redirect_delay, "/");
            }
            Err(e) => {
                tracing::error!("[AddStoryPresenter] Failed to share story: {}", e);
                self.view
                    .show_error(&format!("Failed to share story: {}", e.user_message()));
            }
        }
    }
}
