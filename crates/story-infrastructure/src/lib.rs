//! Concrete collaborators for Story Share: the HTTP API client, session
//! and bookmark stores, the headless map factory, the push manager and
//! configuration loading.

pub mod bookmark_repository;
pub mod config_service;
pub mod dto;
pub mod http_api;
pub mod map;
pub mod paths;
pub mod photo;
pub mod push_manager;
pub mod session_store;
pub mod storage;

pub use crate::bookmark_repository::{FileBookmarkRepository, InMemoryBookmarkRepository};
pub use crate::config_service::ConfigService;
pub use crate::http_api::HttpStoryApi;
pub use crate::map::HeadlessMapFactory;
pub use crate::paths::{ServiceType, StoryPaths};
pub use crate::push_manager::{ApiPushManager, PushService, StaticPushService};
pub use crate::session_store::{FileSessionStore, InMemorySessionStore};
