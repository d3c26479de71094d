//! Session domain module.
//!
//! Contains the session model, the login/registration inputs and the
//! `SessionStore` trait implemented by the infrastructure crate.

mod model;
mod store;

pub use model::{Credentials, Registration, Session, SessionUser};
pub use store::SessionStore;
