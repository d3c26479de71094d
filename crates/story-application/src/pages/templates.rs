//! Markup fragments shared by several pages.

use crate::markup::escape;
use story_core::story::{LatLon, Story, format_coordinate, format_story_date};

pub fn loading() -> String {
    r#"<div class="loading-container"><div class="lds-ripple"><div></div><div></div></div></div>"#
        .to_string()
}

pub fn error_message(message: &str) -> String {
    format!(r#"<div class="error-message">{}</div>"#, escape(message))
}

pub fn empty_message(message: &str) -> String {
    format!(r#"<div class="empty-message">{}</div>"#, escape(message))
}

pub fn coordinates(at: LatLon) -> String {
    format!("{}, {}", format_coordinate(at.lat), format_coordinate(at.lon))
}

/// One story card. `footer` is appended inside the card's meta block.
pub fn story_item(story: &Story, footer: &str) -> String {
    let name = escape(&story.name);
    let map_button = match story.location() {
        Some(at) => format!(
            r#"<button class="map-toggle-button" data-id="{id}" data-lat="{lat}" data-lon="{lon}">Show on map</button>"#,
            id = escape(&story.id),
            lat = at.lat,
            lon = at.lon
        ),
        None => String::new(),
    };

    format!(
        r##"<article class="story-item">
  <div class="story-image-container"><img class="story-image" src="{photo}" alt="Story image from {name}" loading="lazy"></div>
  <div class="story-content">
    <h3 class="story-name">{name}</h3>
    <p class="story-description">{description}</p>
    <div class="story-meta">
      <p class="story-date">{date}</p>
      {map_button}{footer}
    </div>
  </div>
  <a href="#/story/{id}" class="story-link" aria-label="View details of story by {name}"></a>
</article>"##,
        photo = escape(&story.photo_url),
        name = name,
        description = escape(&story.description),
        date = format_story_date(&story.created_at),
        map_button = map_button,
        footer = footer,
        id = escape(&story.id),
    )
}
