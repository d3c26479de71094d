//! Domain layer for Story Share.
//!
//! Models, the shared error type, configuration, and the traits of the
//! collaborators that page presenters talk to.

pub mod api;
pub mod bookmark;
pub mod config;
pub mod error;
pub mod map;
pub mod push;
pub mod session;
pub mod story;

// Re-export common error type
pub use error::{Result, StoryError};
