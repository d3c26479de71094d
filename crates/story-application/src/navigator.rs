//! Handle to the application's event queue.

use crate::lifecycle::ActivationToken;
use crate::page::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;

/// Everything the application loop reacts to, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The location fragment changed.
    Navigate(String),
    /// A user interaction on the mounted page.
    Ui(UiEvent),
    /// Stop processing events.
    Quit,
}

/// Cloneable sender side of the event queue.
#[derive(Debug, Clone)]
pub struct Navigator {
    sender: mpsc::UnboundedSender<AppEvent>,
}

impl Navigator {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Requests a location change. Returns false when the application
    /// has shut down.
    pub fn go(&self, fragment: impl Into<String>) -> bool {
        self.send(AppEvent::Navigate(fragment.into()))
    }

    pub fn dispatch(&self, event: UiEvent) -> bool {
        self.send(AppEvent::Ui(event))
    }

    pub fn quit(&self) -> bool {
        self.send(AppEvent::Quit)
    }

    /// Requests a location change after `delay`, dropped if `token` is
    /// invalidated first.
    pub fn go_after(&self, token: &ActivationToken, delay: Duration, fragment: &str) {
        let navigator = self.clone();
        let fragment = fragment.to_string();
        token.defer(delay, move || async move {
            tracing::debug!("[Navigator] Delayed redirect to {}", fragment);
            navigator.go(fragment);
        });
    }

    fn send(&self, event: AppEvent) -> bool {
        match self.sender.send(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("[Navigator] Event queue closed, dropping {:?}", e.0);
                false
            }
        }
    }
}
