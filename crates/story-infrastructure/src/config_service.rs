//! Configuration service implementation.
//!
//! Loads `AppConfig` from `config.toml` in the application directory and
//! caches it. A missing file yields the defaults; a malformed file is an
//! error so typos do not silently fall back.

use crate::paths::{ServiceType, StoryPaths};
use crate::storage::AtomicTomlFile;
use std::sync::{Arc, RwLock};
use story_core::config::AppConfig;
use story_core::error::{Result, StoryError};

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "STORY_SHARE_BASE_URL";

#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: StoryPaths,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new(paths: StoryPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, loading it on first access.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let cached = self
                .config
                .read()
                .map_err(|_| StoryError::internal("config cache poisoned"))?;
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load()?;
        let mut cached = self
            .config
            .write()
            .map_err(|_| StoryError::internal("config cache poisoned"))?;
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut cached) = self.config.write() {
            *cached = None;
        }
    }

    fn load(&self) -> Result<AppConfig> {
        let path = self.paths.get_path(ServiceType::Config)?;
        let file: AtomicTomlFile<AppConfig> = AtomicTomlFile::new(path.clone());

        let mut config = match file.load()? {
            Some(config) => {
                tracing::debug!("[ConfigService] Loaded config from {:?}", path);
                config
            }
            None => {
                tracing::debug!("[ConfigService] No config at {:?}, using defaults", path);
                AppConfig::default()
            }
        };

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config.api.base_url = base_url.trim().to_string();
            }
        }

        Ok(config)
    }
}
