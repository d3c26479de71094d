//! Location-fragment router.
//!
//! Keeps exactly one page active at a time. Each navigation finishes the
//! outgoing page (token invalidated, `deactivate` awaited) before the
//! incoming page renders. Activation and event handling run as tasks on
//! the runtime, so a slow fetch never blocks the next navigation.

mod pattern;
mod table;

pub use pattern::{RouteParams, RoutePattern, WILDCARD, normalize_fragment};
pub use table::{Resolved, Route, RouteTable, RouteTableBuilder};

use crate::document::{Document, ScopedDocument};
use crate::lifecycle::{ActivationToken, PageState, settle_tracker};
use crate::navigator::Navigator;
use crate::page::{Page, PageContext, UiEvent};
use std::sync::{Arc, Mutex, PoisonError};
use story_core::error::StoryError;
use tokio_util::task::TaskTracker;

/// Report of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The pattern that matched
    pub route: String,
    /// The normalised location
    pub path: String,
    pub params: RouteParams,
    pub page: &'static str,
}

struct ActivePage {
    index: usize,
    path: String,
    page: Arc<dyn Page>,
    ctx: PageContext,
}

type StateCell = Arc<Mutex<PageState>>;

fn set_state(cell: &StateCell, state: PageState) {
    *cell.lock().unwrap_or_else(PoisonError::into_inner) = state;
}

fn get_state(cell: &StateCell) -> PageState {
    *cell.lock().unwrap_or_else(PoisonError::into_inner)
}

fn render_error_markup(error: &StoryError) -> String {
    format!(
        r#"<section class="container page-error"><h2>Something went wrong</h2><p>{}</p></section>"#,
        crate::markup::escape(&error.to_string())
    )
}

pub struct Router {
    table: RouteTable,
    document: Arc<dyn Document>,
    navigator: Navigator,
    states: Vec<StateCell>,
    active: Option<ActivePage>,
    tracker: TaskTracker,
    activations: u64,
}

impl Router {
    pub fn new(table: RouteTable, document: Arc<dyn Document>, navigator: Navigator) -> Self {
        let states = (0..table.len())
            .map(|_| Arc::new(Mutex::new(PageState::Unmounted)))
            .collect();
        Self {
            table,
            document,
            navigator,
            states,
            active: None,
            tracker: TaskTracker::new(),
            activations: 0,
        }
    }

    /// Makes the page registered for `fragment` the active one.
    ///
    /// Never fails: cleanup errors of the outgoing page and activation
    /// errors of the incoming page are logged.
    pub async fn navigate(&mut self, fragment: &str) -> Navigation {
        let resolved = self.table.resolve(fragment);
        let route = &self.table.routes()[resolved.index];
        let (pattern, page) = (route.pattern().to_string(), route.page().clone());
        tracing::info!(
            "[Router] Navigating to {} -> {} ({})",
            resolved.path,
            page.name(),
            pattern
        );

        self.deactivate_current().await;

        let state = self.states[resolved.index].clone();
        set_state(&state, PageState::Rendering);

        self.activations += 1;
        let token = ActivationToken::with_tracker(self.activations, self.tracker.clone());
        let ctx = PageContext {
            params: resolved.params.clone(),
            token: token.clone(),
            document: ScopedDocument::new(self.document.clone(), token.clone()),
            navigator: self.navigator.clone(),
        };

        match page.render(&resolved.params) {
            Ok(markup) => {
                self.document.mount(markup);
                set_state(&state, PageState::Activating);
                tracing::debug!("[Router] {} mounted, activating", page.name());
                Self::spawn_activation(page.clone(), ctx.clone(), state);
            }
            Err(e) => {
                tracing::error!("[Router] Rendering {} failed: {}", page.name(), e);
                self.document.mount(render_error_markup(&e));
                set_state(&state, PageState::Ready);
            }
        }

        self.active = Some(ActivePage {
            index: resolved.index,
            path: resolved.path.clone(),
            page: page.clone(),
            ctx,
        });

        Navigation {
            route: pattern,
            path: resolved.path,
            params: resolved.params,
            page: page.name(),
        }
    }

    fn spawn_activation(page: Arc<dyn Page>, ctx: PageContext, state: StateCell) {
        let token = ctx.token.clone();
        token.clone().spawn(async move {
            let name = page.name();
            if !token.is_live() {
                tracing::debug!("[Router] {} replaced before activation started", name);
                return;
            }
            if let Err(e) = page.activate(ctx).await {
                tracing::error!("[Router] Activation of {} failed: {}", name, e);
            }
            let mut current = state.lock().unwrap_or_else(PoisonError::into_inner);
            if token.is_live() && *current == PageState::Activating {
                *current = PageState::Ready;
                tracing::debug!("[Router] {} ready", name);
            }
        });
    }

    async fn deactivate_current(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        let name = active.page.name();
        let state = &self.states[active.index];

        active.ctx.token.invalidate();
        set_state(state, PageState::Deactivating);
        if let Err(e) = active.page.deactivate().await {
            tracing::warn!("[Router] Cleanup of {} failed: {}", name, e);
        }
        set_state(state, PageState::Unmounted);
        tracing::debug!("[Router] {} unmounted", name);
    }

    /// Hands a UI event to the active page.
    ///
    /// # Returns
    ///
    /// `false` when no page is active.
    pub fn dispatch(&self, event: UiEvent) -> bool {
        let Some(active) = &self.active else {
            tracing::warn!("[Router] No active page for {:?}", event);
            return false;
        };
        let page = active.page.clone();
        let ctx = active.ctx.clone();
        active.ctx.token.spawn(async move {
            let target = event.target().to_string();
            if let Err(e) = page.handle_event(ctx, event).await {
                tracing::error!("[Router] {} failed to handle '{}': {}", page.name(), target, e);
            }
        });
        true
    }

    /// Deactivates the active page without mounting another one.
    pub async fn shutdown(&mut self) {
        self.deactivate_current().await;
    }

    /// Waits for in-flight activations, event handlers and deferred work.
    pub async fn settle(&self) {
        settle_tracker(&self.tracker).await;
    }

    pub fn active_page(&self) -> Option<&'static str> {
        self.active.as_ref().map(|a| a.page.name())
    }

    pub fn active_state(&self) -> PageState {
        self.active
            .as_ref()
            .map(|a| get_state(&self.states[a.index]))
            .unwrap_or_default()
    }

    /// State of the route registered under `pattern`.
    pub fn state_of(&self, pattern: &str) -> Option<PageState> {
        self.table
            .position(pattern)
            .map(|index| get_state(&self.states[index]))
    }

    /// The normalised location of the active page.
    pub fn current(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.path.as_str())
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }
}
