//! Per-activation lifecycle support.

mod state;
mod token;

pub use state::PageState;
pub use token::ActivationToken;
pub(crate) use token::settle_tracker;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
