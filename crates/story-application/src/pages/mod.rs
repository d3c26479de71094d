//! Page controllers of the default route table.

mod about;
mod add_story;
mod bookmark;
mod detail;
mod home;
mod login;
mod not_found;
mod profile;
mod register;
pub mod templates;

pub use about::AboutPage;
pub use add_story::AddStoryPage;
pub use bookmark::BookmarkPage;
pub use detail::StoryDetailPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use profile::ProfilePage;
pub use register::RegisterPage;

use crate::lifecycle::{ActivationToken, lock};
use std::sync::{Arc, Mutex};

/// Holds what one activation of a page owns, tagged with the activation.
///
/// Events and cleanup only see the value installed by the activation
/// they belong to.
pub(crate) struct ActivationSlot<T> {
    inner: Mutex<Option<(u64, Arc<T>)>>,
}

impl<T> Default for ActivationSlot<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }
}

impl<T> ActivationSlot<T> {
    /// Stores `value` for the activation. Refused once the token is dead.
    pub(crate) fn install(&self, token: &ActivationToken, value: Arc<T>) -> bool {
        if !token.is_live() {
            return false;
        }
        *lock(&self.inner) = Some((token.id(), value));
        true
    }

    pub(crate) fn get(&self, token: &ActivationToken) -> Option<Arc<T>> {
        lock(&self.inner)
            .as_ref()
            .filter(|(id, _)| *id == token.id())
            .map(|(_, value)| value.clone())
    }

    pub(crate) fn take(&self) -> Option<Arc<T>> {
        lock(&self.inner).take().map(|(_, value)| value)
    }
}

/// Parses a numeric event value.
pub(crate) fn parse_coordinate(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
