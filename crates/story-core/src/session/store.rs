//! Session store trait.

use super::model::{Session, SessionUser};
use crate::error::Result;

/// Process-wide holder of the current authentication state.
///
/// Pages never mutate the session directly; they read it and clear it
/// through this interface. Reads are cheap and synchronous. Writes are
/// single atomic operations: a reader observes either the old session
/// or the new one, never a partial update.
pub trait SessionStore: Send + Sync {
    /// Returns the whole session, if any.
    fn current(&self) -> Option<Session>;

    /// Returns the bearer token of the current session.
    fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    /// Returns the signed-in user.
    fn user(&self) -> Option<SessionUser> {
        self.current().map(|s| s.user)
    }

    /// Replaces the current session.
    fn set_session(&self, session: Session) -> Result<()>;

    /// Removes the current session (logout).
    fn clear_session(&self) -> Result<()>;

    /// Returns the store to its initial empty state.
    ///
    /// Any session is discarded from memory and from persistent storage
    /// alike, so every store reads `None` afterwards. Tests use this to
    /// start from a known state instead of relying on whatever the store
    /// held when it was constructed.
    fn reset(&self) -> Result<()>;
}
