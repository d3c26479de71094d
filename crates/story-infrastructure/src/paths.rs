//! Path management for Story Share files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/story-share/       # Config directory (platform default via `dirs`)
//! ├── config.toml              # Application configuration
//! ├── session.toml             # Current authentication session
//! └── bookmarks.toml           # Offline bookmarked stories
//! ```
//!
//! Tests pass an explicit base directory so nothing touches the real
//! config directory.

use std::path::{Path, PathBuf};
use story_core::error::{Result, StoryError};

const APP_DIR: &str = "story-share";

/// Kinds of files managed by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Session,
    Bookmarks,
}

impl ServiceType {
    fn file_name(self) -> &'static str {
        match self {
            ServiceType::Config => "config.toml",
            ServiceType::Session => "session.toml",
            ServiceType::Bookmarks => "bookmarks.toml",
        }
    }
}

/// Resolves application file paths, optionally under a custom base dir.
#[derive(Debug, Clone, Default)]
pub struct StoryPaths {
    base_dir: Option<PathBuf>,
}

impl StoryPaths {
    /// Creates a resolver.
    ///
    /// # Arguments
    ///
    /// * `base_dir` - Overrides the platform config directory (for testing)
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the application directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: The base dir, or e.g. `~/.config/story-share/`
    /// - `Err(StoryError::Config)`: The platform config dir is unknown
    pub fn config_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| StoryError::config("Cannot find config directory"))
    }

    /// Returns the path of the file backing `service`.
    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(service.file_name()))
    }
}
