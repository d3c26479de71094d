//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure `ConfigService`.
//! Every field has a default so a missing or partial file is valid.

use crate::story::LatLon;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://story-api.dicoding.dev/v1";

/// Application server key used when subscribing to push notifications.
pub const DEFAULT_VAPID_PUBLIC_KEY: &str =
    "BCCs2eonMI-6H2ctvFaWg-UYdDv387Vno_bzUzALpB442r2lCnsHmtrx8biyPi_E-1fSGABK_Qs_GlvPoJJqxbk";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub timing: TimingSettings,
    #[serde(default)]
    pub push: PushSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    #[serde(default = "default_center")]
    pub default_center: LatLon,
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
    /// Zoom used when a single story is shown
    #[serde(default = "default_story_zoom")]
    pub story_zoom: u8,
    /// Zoom used by the inline maps on the bookmark page
    #[serde(default = "default_bookmark_zoom")]
    pub bookmark_zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_center: default_center(),
            default_zoom: default_zoom(),
            story_zoom: default_story_zoom(),
            bookmark_zoom: default_bookmark_zoom(),
        }
    }
}

/// Delays for deferred page work, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSettings {
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
    #[serde(default = "default_detail_map_delay_ms")]
    pub detail_map_delay_ms: u64,
    #[serde(default = "default_map_resize_delay_ms")]
    pub map_resize_delay_ms: u64,
    #[serde(default = "default_bookmark_map_delay_ms")]
    pub bookmark_map_delay_ms: u64,
}

impl TimingSettings {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn detail_map_delay(&self) -> Duration {
        Duration::from_millis(self.detail_map_delay_ms)
    }

    pub fn map_resize_delay(&self) -> Duration {
        Duration::from_millis(self.map_resize_delay_ms)
    }

    pub fn bookmark_map_delay(&self) -> Duration {
        Duration::from_millis(self.bookmark_map_delay_ms)
    }

    /// All delays set to zero; deferred work still runs on a later tick.
    pub fn immediate() -> Self {
        Self {
            redirect_delay_ms: 0,
            detail_map_delay_ms: 0,
            map_resize_delay_ms: 0,
            bookmark_map_delay_ms: 0,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            redirect_delay_ms: default_redirect_delay_ms(),
            detail_map_delay_ms: default_detail_map_delay_ms(),
            map_resize_delay_ms: default_map_resize_delay_ms(),
            bookmark_map_delay_ms: default_bookmark_map_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSettings {
    #[serde(default = "default_vapid_public_key")]
    pub vapid_public_key: String,
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            vapid_public_key: default_vapid_public_key(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_center() -> LatLon {
    // Jakarta
    LatLon::new(-6.2088, 106.8456)
}

fn default_zoom() -> u8 {
    10
}

fn default_story_zoom() -> u8 {
    15
}

fn default_bookmark_zoom() -> u8 {
    13
}

fn default_redirect_delay_ms() -> u64 {
    1500
}

fn default_detail_map_delay_ms() -> u64 {
    500
}

fn default_map_resize_delay_ms() -> u64 {
    300
}

fn default_bookmark_map_delay_ms() -> u64 {
    100
}

fn default_vapid_public_key() -> String {
    DEFAULT_VAPID_PUBLIC_KEY.to_string()
}
