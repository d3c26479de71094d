//! The document pages are mounted into.
//!
//! A document holds the markup of the mounted page plus named regions
//! (element ids) that views fill in after mounting. Alerts are the
//! transient toast messages shown on top of the page.

use crate::lifecycle::ActivationToken;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

/// Root container of the application.
pub trait Document: Send + Sync {
    /// Replaces the page markup. Regions of the previous page are cleared.
    fn mount(&self, markup: String);

    /// Returns the currently mounted page markup.
    fn markup(&self) -> String;

    /// Replaces the content of the region with the given element id.
    fn set_region(&self, id: &str, markup: String);

    fn region(&self, id: &str) -> Option<String>;

    fn alert(&self, level: AlertLevel, message: &str);
}

#[derive(Debug, Default)]
struct DocumentState {
    markup: String,
    regions: BTreeMap<String, String>,
    alerts: Vec<Alert>,
    mounts: u64,
}

/// A document kept in memory, used by tests and the terminal shell.
#[derive(Debug, Default)]
pub struct InMemoryDocument {
    state: Mutex<DocumentState>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of page mounts so far.
    pub fn mount_count(&self) -> u64 {
        self.lock().mounts
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.lock().alerts.clone()
    }

    /// Removes and returns the alerts raised since the last call.
    pub fn take_alerts(&self) -> Vec<Alert> {
        std::mem::take(&mut self.lock().alerts)
    }

    pub fn regions(&self) -> BTreeMap<String, String> {
        self.lock().regions.clone()
    }
}

impl Document for InMemoryDocument {
    fn mount(&self, markup: String) {
        let mut state = self.lock();
        state.markup = markup;
        state.regions.clear();
        state.mounts += 1;
    }

    fn markup(&self) -> String {
        self.lock().markup.clone()
    }

    fn set_region(&self, id: &str, markup: String) {
        self.lock().regions.insert(id.to_string(), markup);
    }

    fn region(&self, id: &str) -> Option<String> {
        self.lock().regions.get(id).cloned()
    }

    fn alert(&self, level: AlertLevel, message: &str) {
        self.lock().alerts.push(Alert {
            level,
            message: message.to_string(),
        });
    }
}

/// Token-guarded access to the document for one activation.
///
/// Writes made after the activation was invalidated are dropped, so a
/// late result never lands in the page that has replaced its owner.
#[derive(Clone)]
pub struct ScopedDocument {
    document: Arc<dyn Document>,
    token: ActivationToken,
}

impl ScopedDocument {
    pub fn new(document: Arc<dyn Document>, token: ActivationToken) -> Self {
        Self { document, token }
    }

    pub fn is_live(&self) -> bool {
        self.token.is_live()
    }

    /// Writes a region. Returns false when the write was dropped.
    pub fn set_region(&self, id: &str, markup: impl Into<String>) -> bool {
        if !self.token.is_live() {
            tracing::debug!(
                "[ScopedDocument] Dropped write to #{} from stale activation {}",
                id,
                self.token.id()
            );
            return false;
        }
        self.document.set_region(id, markup.into());
        true
    }

    pub fn region(&self, id: &str) -> Option<String> {
        self.document.region(id)
    }

    /// Raises an alert. Returns false when the alert was dropped.
    pub fn alert(&self, level: AlertLevel, message: &str) -> bool {
        if !self.token.is_live() {
            return false;
        }
        self.document.alert(level, message);
        true
    }
}

impl fmt::Debug for ScopedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedDocument")
            .field("activation", &self.token.id())
            .field("live", &self.token.is_live())
            .finish()
    }
}
