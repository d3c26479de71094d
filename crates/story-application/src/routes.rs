//! The default route table.

use crate::pages::{
    AboutPage, AddStoryPage, BookmarkPage, HomePage, LoginPage, NotFoundPage, ProfilePage,
    RegisterPage, StoryDetailPage,
};
use crate::router::{RouteTable, WILDCARD};
use crate::services::AppServices;
use std::sync::Arc;
use story_core::error::Result;

/// Builds the application's route table.
///
/// | pattern      | page          |
/// |--------------|---------------|
/// | `/`          | home          |
/// | `/about`     | about         |
/// | `/login`     | login         |
/// | `/register`  | register      |
/// | `/add`       | add-story     |
/// | `/story/:id` | story-detail  |
/// | `/bookmark`  | bookmark      |
/// | `/profile`   | profile       |
/// | `*`          | not-found     |
pub fn default_routes(services: Arc<AppServices>) -> Result<RouteTable> {
    RouteTable::builder()
        .route("/", Arc::new(HomePage::new(services.clone())))
        .route("/about", Arc::new(AboutPage))
        .route("/login", Arc::new(LoginPage::new(services.clone())))
        .route("/register", Arc::new(RegisterPage::new(services.clone())))
        .route("/add", Arc::new(AddStoryPage::new(services.clone())))
        .route("/story/:id", Arc::new(StoryDetailPage::new(services.clone())))
        .route("/bookmark", Arc::new(BookmarkPage::new(services.clone())))
        .route("/profile", Arc::new(ProfilePage::new(services)))
        .route(WILDCARD, Arc::new(NotFoundPage))
        .build()
}
