//! Page controller contract.
//!
//! Every route maps to one [`Page`]. The router drives it through
//! `render -> activate -> (handle_event)* -> deactivate`, handing each
//! activation a fresh [`PageContext`].

mod event;

pub use event::UiEvent;

use crate::document::ScopedDocument;
use crate::lifecycle::ActivationToken;
use crate::navigator::Navigator;
use crate::router::RouteParams;
use async_trait::async_trait;
use std::time::Duration;
use story_core::error::Result;

/// What one activation of a page gets to work with.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub params: RouteParams,
    pub token: ActivationToken,
    pub document: ScopedDocument,
    pub navigator: Navigator,
}

impl PageContext {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Navigates to `fragment` after `delay`, unless this activation has
    /// ended by then.
    pub fn redirect_after(&self, delay: Duration, fragment: &str) {
        self.navigator.go_after(&self.token, delay, fragment);
    }
}

#[async_trait]
pub trait Page: Send + Sync {
    /// Short identifier used in logs and navigation reports.
    fn name(&self) -> &'static str;

    /// Produces the page markup for the given route parameters.
    ///
    /// Must not mutate shared state.
    fn render(&self, params: &RouteParams) -> Result<String>;

    /// Wires behavior after the markup is mounted and starts the
    /// initial data fetch.
    async fn activate(&self, ctx: PageContext) -> Result<()>;

    /// Reacts to a user interaction while the page is active.
    async fn handle_event(&self, _ctx: PageContext, _event: UiEvent) -> Result<()> {
        Ok(())
    }

    /// Releases what `activate` acquired. Must be idempotent.
    async fn deactivate(&self) -> Result<()> {
        Ok(())
    }
}
