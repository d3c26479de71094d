//! Activation tokens.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Liveness flag for one page activation.
///
/// The router creates a fresh token for every activation and
/// invalidates it before the page's `deactivate` hook runs. Everything
/// the activation schedules (deferred map work, delayed redirects,
/// event handlers) is spawned through the token, so the router can
/// await it and late work can tell that its page is gone.
#[derive(Debug, Clone)]
pub struct ActivationToken {
    id: u64,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl ActivationToken {
    /// Creates a standalone token with its own task tracker.
    pub fn new(id: u64) -> Self {
        Self::with_tracker(id, TaskTracker::new())
    }

    /// Creates a token whose tasks are tracked by `tracker`.
    pub fn with_tracker(id: u64, tracker: TaskTracker) -> Self {
        Self {
            id,
            cancel: CancellationToken::new(),
            tracker,
        }
    }

    /// Derives a token for one batch of work inside this activation.
    ///
    /// The child dies with its parent, and invalidating the child leaves
    /// the parent live. Tasks share the parent's tracker.
    pub fn child(&self) -> Self {
        Self {
            id: self.id,
            cancel: self.cancel.child_token(),
            tracker: self.tracker.clone(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_live(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Marks the activation as finished. Idempotent.
    pub fn invalidate(&self) {
        if self.is_live() {
            tracing::debug!("[ActivationToken] Invalidated activation {}", self.id);
        }
        self.cancel.cancel();
    }

    /// Resolves once the token has been invalidated.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Spawns a task tracked alongside this activation.
    pub fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.tracker.spawn(task)
    }

    /// Schedules `work` to run after `delay`, only if the activation is
    /// still live by then.
    ///
    /// # Returns
    ///
    /// A handle resolving to `true` when the work ran and `false` when
    /// it was skipped because the token was invalidated first.
    pub fn defer<F, Fut>(&self, delay: Duration, work: F) -> JoinHandle<bool>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancel.cancelled() => {
                    tracing::debug!(
                        "[ActivationToken] Deferred work dropped for activation {}",
                        token.id
                    );
                    false
                }
                _ = tokio::time::sleep(delay) => {
                    if !token.is_live() {
                        return false;
                    }
                    work().await;
                    true
                }
            }
        })
    }

    /// Awaits `future` to completion and keeps its output only if the
    /// activation is still live afterwards.
    ///
    /// The future itself is never cut short; in-flight requests are
    /// allowed to finish and their results are discarded.
    pub async fn guard<F: Future>(&self, future: F) -> Option<F::Output> {
        let output = future.await;
        if self.is_live() {
            Some(output)
        } else {
            tracing::debug!(
                "[ActivationToken] Discarding result for stale activation {}",
                self.id
            );
            None
        }
    }

    /// Waits until every task spawned through the tracker has finished.
    pub async fn settle(&self) {
        settle_tracker(&self.tracker).await;
    }
}

pub(crate) async fn settle_tracker(tracker: &TaskTracker) {
    tracker.close();
    tracker.wait().await;
    tracker.reopen();
}
