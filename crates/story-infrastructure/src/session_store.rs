//! Session store implementations.
//!
//! - [`InMemorySessionStore`]: process-local, used by tests and the CLI
//!   `--ephemeral` mode
//! - [`FileSessionStore`]: persists the session to `session.toml` so a
//!   login survives restarts

use crate::paths::{ServiceType, StoryPaths};
use crate::storage::AtomicTomlFile;
use std::path::PathBuf;
use std::sync::RwLock;
use story_core::error::{Result, StoryError};
use story_core::session::{Session, SessionStore};

fn poisoned() -> StoryError {
    StoryError::internal("session lock poisoned")
}

/// Session store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn current(&self) -> Option<Session> {
        self.session.read().ok().and_then(|s| s.clone())
    }

    fn set_session(&self, session: Session) -> Result<()> {
        *self.session.write().map_err(|_| poisoned())? = Some(session);
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        *self.session.write().map_err(|_| poisoned())? = None;
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        self.clear_session()
    }
}

/// Session store backed by a TOML file.
///
/// The file is read once at construction; reads afterwards are served
/// from memory. Writes update the file first and
/// the cache second, so a failed write leaves both unchanged.
pub struct FileSessionStore {
    file: AtomicTomlFile<Session>,
    cache: RwLock<Option<Session>>,
}

impl FileSessionStore {
    /// Opens the session file in the application directory.
    pub fn open(paths: &StoryPaths) -> Result<Self> {
        Self::with_path(paths.get_path(ServiceType::Session)?)
    }

    pub fn with_path(path: PathBuf) -> Result<Self> {
        let file = AtomicTomlFile::new(path);
        let initial = file.load()?;
        if initial.is_some() {
            tracing::debug!("[FileSessionStore] Restored session from {:?}", file.path());
        }
        Ok(Self {
            file,
            cache: RwLock::new(initial),
        })
    }
}

impl SessionStore for FileSessionStore {
    fn current(&self) -> Option<Session> {
        self.cache.read().ok().and_then(|s| s.clone())
    }

    fn set_session(&self, session: Session) -> Result<()> {
        let mut cache = self.cache.write().map_err(|_| poisoned())?;
        self.file.save(&session)?;
        *cache = Some(session);
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        let mut cache = self.cache.write().map_err(|_| poisoned())?;
        self.file.delete()?;
        *cache = None;
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        let mut cache = self.cache.write().map_err(|_| poisoned())?;
        self.file.delete()?;
        *cache = None;
        tracing::debug!("[FileSessionStore] Reset {:?}", self.file.path());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_core::session::SessionUser;
    use tempfile::TempDir;

    fn session() -> Session {
        Session::new(
            "token-abc",
            SessionUser {
                id: "user-1".to_string(),
                name: "Dimas".to_string(),
            },
        )
    }

    #[test]
    fn test_in_memory_lifecycle() {
        let store = InMemorySessionStore::new();
        assert!(store.token().is_none());

        store.set_session(session()).unwrap();
        assert_eq!(store.token().as_deref(), Some("token-abc"));
        assert_eq!(store.user().map(|u| u.name), Some("Dimas".to_string()));

        store.clear_session().unwrap();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let paths = StoryPaths::new(Some(dir.path()));

        let store = FileSessionStore::open(&paths).unwrap();
        store.set_session(session()).unwrap();

        let reopened = FileSessionStore::open(&paths).unwrap();
        assert_eq!(reopened.current(), Some(session()));

        reopened.clear_session().unwrap();
        assert!(FileSessionStore::open(&paths).unwrap().current().is_none());
    }

    #[test]
    fn test_reset_empties_both_stores() {
        let dir = TempDir::new().unwrap();
        let paths = StoryPaths::new(Some(dir.path()));
        let memory = InMemorySessionStore::with_session(session());
        let file = FileSessionStore::open(&paths).unwrap();
        file.set_session(session()).unwrap();

        let stores: [&dyn SessionStore; 2] = [&memory, &file];
        for store in stores {
            store.reset().unwrap();
            assert!(store.current().is_none());
            // Resetting an empty store is fine
            store.reset().unwrap();
        }

        assert!(FileSessionStore::open(&paths).unwrap().current().is_none());
    }
}
