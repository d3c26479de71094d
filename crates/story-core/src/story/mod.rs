//! Story domain module.
//!
//! - `model`: `Story`, coordinates, queries and new-story fields
//! - `envelope`: the success/error envelope returned by remote calls
//! - `format`: date and coordinate formatting for templates

mod envelope;
mod format;
mod model;

pub use envelope::Envelope;
pub use format::{format_coordinate, format_story_date};
pub use model::{LatLon, NewStory, Photo, Story, StoryQuery};
