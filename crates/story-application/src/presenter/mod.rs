//! Presenters mediate between a page's view and its collaborators.
//!
//! Each presenter is built per activation with a view trait object and
//! the collaborators it needs. Every public operation ends in exactly
//! one terminal view call (data, empty, or error); `show_loading` style
//! calls only precede it.

pub mod add_story;
pub mod auth;
pub mod bookmark;
pub mod detail;
pub mod home;
pub mod profile;

pub use add_story::{AddStoryPresenter, AddStoryView};
pub use auth::{AuthPresenter, AuthView};
pub use bookmark::{BookmarkPresenter, BookmarkView, bookmark_map_container};
pub use detail::{StoryDetailPresenter, StoryDetailView};
pub use home::{HomePresenter, HomeView, STORY_MAP_CONTAINER};
pub use profile::{ProfilePresenter, ProfileView};
