//! Routing, page lifecycle and presenters for Story Share.
//!
//! - [`router`]: location fragments to pages, one active page at a time
//! - [`page`]: the page controller contract
//! - [`presenter`]: view/collaborator mediation per page
//! - [`pages`]: the page controllers of [`default_routes`]
//! - [`app`]: the event loop driving the router

pub mod app;
pub mod document;
pub mod lifecycle;
pub mod markup;
pub mod navigator;
pub mod page;
pub mod pages;
pub mod presenter;
pub mod router;
pub mod routes;
pub mod services;

pub use app::App;
pub use document::{Alert, AlertLevel, Document, InMemoryDocument, ScopedDocument};
pub use lifecycle::{ActivationToken, PageState};
pub use navigator::{AppEvent, Navigator};
pub use page::{Page, PageContext, UiEvent};
pub use router::{Navigation, RouteParams, RouteTable, Router};
pub use routes::default_routes;
pub use services::AppServices;
