//! Bookmark repository trait.

use crate::error::Result;
use crate::story::Story;
use async_trait::async_trait;

/// A local persistent collection of saved stories, keyed by story id.
///
/// Works independently of network connectivity. Implementations must
/// keep at most one record per id: `put` on an existing id replaces it.
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Lists every bookmarked story.
    async fn get_all(&self) -> Result<Vec<Story>>;

    /// Finds a bookmarked story by id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Story))`: Story is bookmarked
    /// - `Ok(None)`: Story is not bookmarked
    /// - `Err(_)`: Error occurred during retrieval
    async fn get_by_id(&self, id: &str) -> Result<Option<Story>>;

    /// Inserts or replaces a bookmark.
    async fn put(&self, story: &Story) -> Result<()>;

    /// Removes a bookmark. Removing an unknown id is not an error.
    async fn remove(&self, id: &str) -> Result<()>;
}
