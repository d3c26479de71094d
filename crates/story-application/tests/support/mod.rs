//! Shared fakes for the application tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use story_application::AppServices;
use story_core::api::StoryApi;
use story_core::config::{AppConfig, TimingSettings};
use story_core::error::{Result, StoryError};
use story_core::push::{
    LocalNotification, PermissionStatus, PushNotificationManager, PushOutcome, PushSubscription,
};
use story_core::session::{Credentials, Registration, Session, SessionUser};
use story_core::story::{Envelope, NewStory, Story, StoryQuery};
use story_infrastructure::{HeadlessMapFactory, InMemoryBookmarkRepository, InMemorySessionStore};
use tokio::sync::Notify;

pub fn story(id: &str, created_at: &str, location: Option<(f64, f64)>) -> Story {
    Story {
        id: id.to_string(),
        name: format!("Author of {}", id),
        description: format!("Description of {}", id),
        photo_url: format!("https://example.com/{}.jpg", id),
        created_at: created_at.parse::<DateTime<Utc>>().unwrap(),
        lat: location.map(|(lat, _)| lat),
        lon: location.map(|(_, lon)| lon),
    }
}

pub fn session() -> Session {
    Session::new(
        "secret-token",
        SessionUser {
            id: "user-1".to_string(),
            name: "Dimas".to_string(),
        },
    )
}

pub fn config() -> AppConfig {
    AppConfig {
        timing: TimingSettings::immediate(),
        ..AppConfig::default()
    }
}

/// What the fake API was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Register(String),
    Login(String),
    GetStories { token: Option<String> },
    GetStory { token: Option<String>, id: String },
    AddStory {
        token: Option<String>,
        description: String,
        lat: Option<f64>,
        lon: Option<f64>,
    },
}

/// An in-memory backend.
#[derive(Default)]
pub struct FakeApi {
    pub stories: Mutex<Vec<Story>>,
    pub failure: Mutex<Option<String>>,
    pub offline: AtomicBool,
    /// When set, `get_story` waits for a notification before answering.
    pub detail_gate: Mutex<Option<Arc<Notify>>>,
    pub calls: Mutex<Vec<ApiCall>>,
}

impl FakeApi {
    pub fn with_stories(stories: Vec<Story>) -> Self {
        Self {
            stories: Mutex::new(stories),
            ..Self::default()
        }
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn gate_details(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.detail_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check<T>(&self) -> Result<Option<Envelope<T>>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoryError::transport("connection refused"));
        }
        Ok(self.failure.lock().unwrap().clone().map(Envelope::failure))
    }
}

#[async_trait]
impl StoryApi for FakeApi {
    async fn register(&self, registration: &Registration) -> Result<Envelope<()>> {
        self.record(ApiCall::Register(registration.email.clone()));
        if let Some(failure) = self.check()? {
            return Ok(failure);
        }
        Ok(Envelope::success("User created", ()))
    }

    async fn login(&self, credentials: &Credentials) -> Result<Envelope<Session>> {
        self.record(ApiCall::Login(credentials.email.clone()));
        if let Some(failure) = self.check()? {
            return Ok(failure);
        }
        Ok(Envelope::success("success", session()))
    }

    async fn get_stories(
        &self,
        token: Option<&str>,
        _query: &StoryQuery,
    ) -> Result<Envelope<Vec<Story>>> {
        self.record(ApiCall::GetStories {
            token: token.map(str::to_string),
        });
        if let Some(failure) = self.check()? {
            return Ok(failure);
        }
        let stories = self.stories.lock().unwrap().clone();
        Ok(Envelope::success("Stories fetched successfully", stories))
    }

    async fn get_story(&self, token: Option<&str>, id: &str) -> Result<Envelope<Story>> {
        self.record(ApiCall::GetStory {
            token: token.map(str::to_string),
            id: id.to_string(),
        });
        let gate = self.detail_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(failure) = self.check()? {
            return Ok(failure);
        }
        let found = self
            .stories
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned();
        Ok(match found {
            Some(story) => Envelope::success("Story fetched successfully", story),
            None => Envelope::failure("Story not found"),
        })
    }

    async fn add_story(&self, token: Option<&str>, story: &NewStory) -> Result<Envelope<()>> {
        self.record(ApiCall::AddStory {
            token: token.map(str::to_string),
            description: story.description.clone(),
            lat: story.lat,
            lon: story.lon,
        });
        if let Some(failure) = self.check()? {
            return Ok(failure);
        }
        Ok(Envelope::success("success", ()))
    }

    async fn subscribe_push(
        &self,
        _token: &str,
        _subscription: &PushSubscription,
    ) -> Result<Envelope<()>> {
        Ok(Envelope::success("subscribed", ()))
    }

    async fn unsubscribe_push(&self, _token: &str, _endpoint: &str) -> Result<Envelope<()>> {
        Ok(Envelope::success("unsubscribed", ()))
    }
}

/// Push manager with scripted answers.
pub struct FakePush {
    pub permission: Mutex<PermissionStatus>,
    pub subscribed: AtomicBool,
    pub status_fault: AtomicBool,
    pub toggle_fault: Mutex<Option<String>>,
    pub shown: Mutex<Vec<LocalNotification>>,
}

impl FakePush {
    pub fn new(permission: PermissionStatus) -> Self {
        Self {
            permission: Mutex::new(permission),
            subscribed: AtomicBool::new(false),
            status_fault: AtomicBool::new(false),
            toggle_fault: Mutex::new(None),
            shown: Mutex::new(Vec::new()),
        }
    }

    fn fault(&self) -> Result<()> {
        match self.toggle_fault.lock().unwrap().clone() {
            Some(message) => Err(StoryError::resource(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PushNotificationManager for FakePush {
    fn permission_status(&self) -> PermissionStatus {
        *self.permission.lock().unwrap()
    }

    async fn is_subscribed(&self) -> Result<bool> {
        if self.status_fault.load(Ordering::SeqCst) {
            return Err(StoryError::internal("service worker unavailable"));
        }
        Ok(self.subscribed.load(Ordering::SeqCst))
    }

    async fn subscribe(&self) -> Result<PushOutcome> {
        self.fault()?;
        self.subscribed.store(true, Ordering::SeqCst);
        Ok(PushOutcome {
            message: "Successfully subscribed to push notifications".to_string(),
        })
    }

    async fn unsubscribe(&self) -> Result<PushOutcome> {
        self.fault()?;
        self.subscribed.store(false, Ordering::SeqCst);
        Ok(PushOutcome {
            message: "Successfully unsubscribed from push notifications".to_string(),
        })
    }

    async fn show_local(&self, notification: &LocalNotification) -> Result<()> {
        self.fault()?;
        self.shown.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Every collaborator, kept concrete so tests can inspect them.
pub struct Fixture {
    pub api: Arc<FakeApi>,
    pub session: Arc<InMemorySessionStore>,
    pub bookmarks: Arc<InMemoryBookmarkRepository>,
    pub maps: Arc<HeadlessMapFactory>,
    pub push: Arc<FakePush>,
}

impl Fixture {
    pub fn new(stories: Vec<Story>) -> Self {
        Self {
            api: Arc::new(FakeApi::with_stories(stories)),
            session: Arc::new(InMemorySessionStore::new()),
            bookmarks: Arc::new(InMemoryBookmarkRepository::new()),
            maps: Arc::new(HeadlessMapFactory::new()),
            push: Arc::new(FakePush::new(PermissionStatus::Granted)),
        }
    }

    pub fn services(&self) -> Arc<AppServices> {
        self.services_with(config())
    }

    pub fn services_with(&self, config: AppConfig) -> Arc<AppServices> {
        Arc::new(AppServices {
            api: self.api.clone(),
            session: self.session.clone(),
            bookmarks: self.bookmarks.clone(),
            maps: self.maps.clone(),
            push: self.push.clone(),
            config,
        })
    }
}

/// Collects view calls as short strings such as `"error:Story not found"`.
#[derive(Default)]
pub struct Calls {
    entries: Mutex<Vec<String>>,
}

impl Calls {
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn all(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Calls whose kind is one of `kinds` (the part before `:`).
    pub fn of_kind(&self, kinds: &[&str]) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|entry| kinds.contains(&entry.split(':').next().unwrap_or_default()))
            .collect()
    }
}
