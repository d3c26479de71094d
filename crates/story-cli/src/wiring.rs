//! Builds the collaborators the application runs on.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use story_application::AppServices;
use story_core::bookmark::BookmarkRepository;
use story_core::push::{PermissionStatus, PushKeys, PushSubscription};
use story_core::session::SessionStore;
use story_infrastructure::{
    ApiPushManager, ConfigService, FileBookmarkRepository, FileSessionStore, HeadlessMapFactory,
    HttpStoryApi, InMemoryBookmarkRepository, InMemorySessionStore, StaticPushService, StoryPaths,
};

/// Where state lives and how push is provisioned.
#[derive(Debug, Clone, Default)]
pub struct Setup {
    pub config_dir: Option<PathBuf>,
    /// Keep the session and bookmarks in memory only.
    pub ephemeral: bool,
    /// Endpoint of a push subscription issued outside the shell.
    pub push_endpoint: Option<String>,
    pub push_p256dh: String,
    pub push_auth: String,
}

impl Setup {
    fn push_service(&self) -> StaticPushService {
        match &self.push_endpoint {
            Some(endpoint) => StaticPushService::new(
                PermissionStatus::Default,
                PushSubscription {
                    endpoint: endpoint.clone(),
                    keys: PushKeys {
                        p256dh: self.push_p256dh.clone(),
                        auth: self.push_auth.clone(),
                    },
                },
            ),
            // Without a subscription there is nothing to register
            None => StaticPushService::new(
                PermissionStatus::Unsupported,
                PushSubscription {
                    endpoint: String::new(),
                    keys: PushKeys {
                        p256dh: String::new(),
                        auth: String::new(),
                    },
                },
            ),
        }
    }
}

/// Everything the shell needs beyond the services bundle.
pub struct Wiring {
    pub services: Arc<AppServices>,
    pub maps: Arc<HeadlessMapFactory>,
}

pub fn build(setup: &Setup) -> Result<Wiring> {
    let paths = StoryPaths::new(setup.config_dir.as_deref());
    let config = ConfigService::new(paths.clone())
        .get_config()
        .context("Failed to load configuration")?;
    tracing::info!("[Wiring] API base URL: {}", config.api.base_url);

    let api = Arc::new(HttpStoryApi::new(&config.api).context("Failed to build HTTP client")?);

    let (session, bookmarks): (Arc<dyn SessionStore>, Arc<dyn BookmarkRepository>) =
        if setup.ephemeral {
            tracing::info!("[Wiring] Ephemeral mode: session and bookmarks stay in memory");
            (
                Arc::new(InMemorySessionStore::new()),
                Arc::new(InMemoryBookmarkRepository::new()),
            )
        } else {
            (
                Arc::new(FileSessionStore::open(&paths).context("Failed to open session store")?),
                Arc::new(
                    FileBookmarkRepository::open(&paths).context("Failed to open bookmark store")?,
                ),
            )
        };

    let push = Arc::new(
        ApiPushManager::new(
            api.clone(),
            session.clone(),
            Arc::new(setup.push_service()),
            &config.push.vapid_public_key,
        )
        .context("Failed to set up push notifications")?,
    );
    let maps = Arc::new(HeadlessMapFactory::new());

    let services = Arc::new(AppServices {
        api,
        session,
        bookmarks,
        maps: maps.clone(),
        push,
        config,
    });
    Ok(Wiring { services, maps })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_without_endpoint_is_unsupported() {
        use story_infrastructure::PushService;
        let service = Setup::default().push_service();
        assert_eq!(service.permission(), PermissionStatus::Unsupported);
    }

    #[test]
    fn test_push_with_endpoint_awaits_permission() {
        use story_infrastructure::PushService;
        let setup = Setup {
            push_endpoint: Some("https://push.example.com/abc".to_string()),
            ..Setup::default()
        };
        assert_eq!(setup.push_service().permission(), PermissionStatus::Default);
    }
}
