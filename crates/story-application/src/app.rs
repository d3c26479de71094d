//! Application entry point: router plus the single event queue.

use crate::document::Document;
use crate::navigator::{AppEvent, Navigator};
use crate::router::{Navigation, RouteTable, Router};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Processes location changes and UI events in arrival order.
pub struct App {
    router: Router,
    navigator: Navigator,
    events: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(routes: RouteTable, document: Arc<dyn Document>) -> Self {
        let (navigator, events) = Navigator::channel();
        Self {
            router: Router::new(routes, document, navigator.clone()),
            navigator,
            events,
        }
    }

    /// Handle for pushing events into the queue from anywhere.
    pub fn navigator(&self) -> Navigator {
        self.navigator.clone()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Performs the initial navigation without entering the event loop.
    pub async fn open(&mut self, initial_fragment: &str) -> Navigation {
        self.router.navigate(initial_fragment).await
    }

    /// Navigates to `initial_fragment`, then processes events until a
    /// quit request arrives.
    pub async fn start(&mut self, initial_fragment: &str) {
        tracing::info!("[App] Starting at {}", initial_fragment);
        self.open(initial_fragment).await;

        while let Some(event) = self.events.recv().await {
            if !self.handle(event).await {
                break;
            }
        }
        self.stop().await;
    }

    /// Applies one event. Returns false for a quit request.
    pub async fn handle(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Navigate(fragment) => {
                self.router.navigate(&fragment).await;
                true
            }
            AppEvent::Ui(event) => {
                self.router.dispatch(event);
                true
            }
            AppEvent::Quit => false,
        }
    }

    /// Runs until no task is in flight and the queue is empty.
    ///
    /// # Returns
    ///
    /// `false` when a quit request was dequeued.
    pub async fn run_until_idle(&mut self) -> bool {
        loop {
            self.router.settle().await;
            match self.events.try_recv() {
                Ok(event) => {
                    if !self.handle(event).await {
                        return false;
                    }
                }
                Err(_) => return true,
            }
        }
    }

    /// Deactivates the active page and waits for its tasks.
    pub async fn stop(&mut self) {
        self.router.shutdown().await;
        self.router.settle().await;
        tracing::info!("[App] Stopped");
    }
}
