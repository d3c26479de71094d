//! Story domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geotagged photo story as returned by the remote API.
///
/// The same record is what the bookmark store persists, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Remote identifier (e.g. `story-FvU4u0Vp2S3PMsFg`)
    pub id: String,
    /// Display name of the author
    pub name: String,
    pub description: String,
    #[serde(rename = "photoUrl")]
    pub photo_url: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl Story {
    /// Returns the story coordinates when both are present.
    pub fn location(&self) -> Option<LatLon> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(LatLon { lat, lon }),
            _ => None,
        }
    }

    pub fn has_location(&self) -> bool {
        self.location().is_some()
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true when both coordinates are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Filters for listing stories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoryQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// Only stories carrying coordinates (wire: `location=1`)
    pub with_location: bool,
}

impl StoryQuery {
    pub fn with_location() -> Self {
        Self {
            with_location: true,
            ..Self::default()
        }
    }
}

/// An image attached to a new story.
#[derive(Clone, PartialEq)]
pub struct Photo {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Photo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Photo")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Fields submitted when sharing a new story.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStory {
    pub description: String,
    pub photo: Photo,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl NewStory {
    pub fn new(description: impl Into<String>, photo: Photo) -> Self {
        Self {
            description: description.into(),
            photo,
            lat: None,
            lon: None,
        }
    }

    pub fn at(mut self, location: Option<LatLon>) -> Self {
        self.lat = location.map(|l| l.lat);
        self.lon = location.map(|l| l.lon);
        self
    }
}
