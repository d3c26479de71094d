//! Remote story/auth API contract.

use crate::error::Result;
use crate::push::PushSubscription;
use crate::session::{Credentials, Registration, Session};
use crate::story::{Envelope, NewStory, Story, StoryQuery};
use async_trait::async_trait;

/// Outbound calls to the Story Share backend.
///
/// Every call that reaches the server returns an [`Envelope`]. Ordinary
/// business failures (bad credentials, validation failures, a missing
/// or expired token, unknown ids) are `Envelope::Failure`. `Err` is
/// reserved for transport-level faults: connection errors, timeouts and
/// bodies that cannot be parsed.
///
/// Methods taking `token: Option<&str>` send a bearer `Authorization`
/// header only when a token is given.
#[async_trait]
pub trait StoryApi: Send + Sync {
    /// Creates a new account.
    async fn register(&self, registration: &Registration) -> Result<Envelope<()>>;

    /// Exchanges credentials for a session.
    async fn login(&self, credentials: &Credentials) -> Result<Envelope<Session>>;

    /// Lists stories.
    async fn get_stories(
        &self,
        token: Option<&str>,
        query: &StoryQuery,
    ) -> Result<Envelope<Vec<Story>>>;

    /// Fetches one story.
    async fn get_story(&self, token: Option<&str>, id: &str) -> Result<Envelope<Story>>;

    /// Shares a new story. Without a token the guest endpoint is used.
    async fn add_story(&self, token: Option<&str>, story: &NewStory) -> Result<Envelope<()>>;

    /// Registers a push subscription for the signed-in user.
    async fn subscribe_push(
        &self,
        token: &str,
        subscription: &PushSubscription,
    ) -> Result<Envelope<()>>;

    /// Removes a push subscription by endpoint.
    async fn unsubscribe_push(&self, token: &str, endpoint: &str) -> Result<Envelope<()>>;
}
