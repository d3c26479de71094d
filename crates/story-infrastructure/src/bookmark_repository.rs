//! Bookmark repository implementations.
//!
//! Both keep at most one record per story id; `put` on a known id
//! replaces the stored record in place.

use crate::paths::{ServiceType, StoryPaths};
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use story_core::bookmark::BookmarkRepository;
use story_core::error::{Result, StoryError};
use story_core::story::Story;
use tokio::sync::Mutex;
use tokio::task;

/// On-disk layout of `bookmarks.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct BookmarkFile {
    #[serde(default)]
    stories: Vec<Story>,
}

fn upsert(stories: &mut Vec<Story>, story: &Story) {
    match stories.iter_mut().find(|s| s.id == story.id) {
        Some(existing) => *existing = story.clone(),
        None => stories.push(story.clone()),
    }
}

/// Bookmark store kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryBookmarkRepository {
    stories: Mutex<Vec<Story>>,
}

impl InMemoryBookmarkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every bookmark.
    pub async fn reset(&self) {
        self.stories.lock().await.clear();
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryBookmarkRepository {
    async fn get_all(&self) -> Result<Vec<Story>> {
        Ok(self.stories.lock().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Story>> {
        Ok(self.stories.lock().await.iter().find(|s| s.id == id).cloned())
    }

    async fn put(&self, story: &Story) -> Result<()> {
        upsert(&mut *self.stories.lock().await, story);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.stories.lock().await.retain(|s| s.id != id);
        Ok(())
    }
}

/// Bookmark store persisted to `bookmarks.toml`.
///
/// Every mutation is a locked read-modify-write of the whole file, so
/// two processes sharing the directory never interleave partial writes.
/// File access and lock waits run on the blocking pool.
pub struct FileBookmarkRepository {
    file: Arc<AtomicTomlFile<BookmarkFile>>,
    /// Serializes operations within this process
    guard: Mutex<()>,
}

impl FileBookmarkRepository {
    pub fn open(paths: &StoryPaths) -> Result<Self> {
        Ok(Self::with_path(paths.get_path(ServiceType::Bookmarks)?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            guard: Mutex::new(()),
        }
    }

    /// Deletes the backing file.
    pub async fn reset(&self) -> Result<()> {
        let _guard = self.guard.lock().await;
        self.blocking(|file| file.delete()).await
    }

    async fn blocking<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&AtomicTomlFile<BookmarkFile>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let file = self.file.clone();
        task::spawn_blocking(move || f(&file))
            .await
            .map_err(|e| StoryError::io(format!("Failed to spawn blocking task: {}", e)))?
    }

    async fn load(&self) -> Result<Vec<Story>> {
        self.blocking(|file| Ok(file.load()?.unwrap_or_default().stories))
            .await
    }
}

#[async_trait]
impl BookmarkRepository for FileBookmarkRepository {
    async fn get_all(&self) -> Result<Vec<Story>> {
        let _guard = self.guard.lock().await;
        self.load().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Story>> {
        let _guard = self.guard.lock().await;
        Ok(self.load().await?.into_iter().find(|s| s.id == id))
    }

    async fn put(&self, story: &Story) -> Result<()> {
        let _guard = self.guard.lock().await;
        let record = story.clone();
        self.blocking(move |file| {
            file.update(BookmarkFile::default(), |data| {
                upsert(&mut data.stories, &record);
                Ok(())
            })
        })
        .await?;
        tracing::debug!("[FileBookmarkRepository] Saved bookmark {}", story.id);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let _guard = self.guard.lock().await;
        let target = id.to_string();
        self.blocking(move |file| {
            file.update(BookmarkFile::default(), |data| {
                data.stories.retain(|s| s.id != target);
                Ok(())
            })
        })
        .await?;
        tracing::debug!("[FileBookmarkRepository] Removed bookmark {}", id);
        Ok(())
    }
}
