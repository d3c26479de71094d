//! Wire DTOs for the Story Share REST API.
//!
//! Every response body is a JSON object with `error` and `message`
//! fields plus an endpoint-specific payload. These types convert that
//! shape into the domain [`Envelope`].

use serde::{Deserialize, Serialize};
use story_core::error::{Result, StoryError};
use story_core::push::PushSubscription;
use story_core::session::{Session, SessionUser};
use story_core::story::{Envelope, Story};

/// Converts a decoded response body into an envelope.
pub trait IntoEnvelope<T> {
    fn into_envelope(self) -> Result<Envelope<T>>;
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
}

impl IntoEnvelope<()> for MessageResponse {
    fn into_envelope(self) -> Result<Envelope<()>> {
        if self.error {
            Ok(Envelope::failure(self.message))
        } else {
            Ok(Envelope::success(self.message, ()))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StoriesResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "listStory", default)]
    pub list_story: Vec<Story>,
}

impl IntoEnvelope<Vec<Story>> for StoriesResponse {
    fn into_envelope(self) -> Result<Envelope<Vec<Story>>> {
        if self.error {
            Ok(Envelope::failure(self.message))
        } else {
            Ok(Envelope::success(self.message, self.list_story))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StoryResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub story: Option<Story>,
}

impl IntoEnvelope<Story> for StoryResponse {
    fn into_envelope(self) -> Result<Envelope<Story>> {
        if self.error {
            return Ok(Envelope::failure(self.message));
        }
        let story = self
            .story
            .ok_or_else(|| StoryError::transport("response is missing `story`"))?;
        Ok(Envelope::success(self.message, story))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginResultDto {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "loginResult", default)]
    pub login_result: Option<LoginResultDto>,
}

impl IntoEnvelope<Session> for LoginResponse {
    fn into_envelope(self) -> Result<Envelope<Session>> {
        if self.error {
            return Ok(Envelope::failure(self.message));
        }
        let result = self
            .login_result
            .ok_or_else(|| StoryError::transport("response is missing `loginResult`"))?;
        let session = Session::new(
            result.token,
            SessionUser {
                id: result.user_id,
                name: result.name,
            },
        );
        Ok(Envelope::success(self.message, session))
    }
}

/// Body of `POST /notifications/subscribe`.
#[derive(Debug, Serialize)]
pub struct SubscribeRequest<'a> {
    pub endpoint: &'a str,
    pub keys: SubscribeKeys<'a>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeKeys<'a> {
    pub p256dh: &'a str,
    pub auth: &'a str,
}

impl<'a> From<&'a PushSubscription> for SubscribeRequest<'a> {
    fn from(subscription: &'a PushSubscription) -> Self {
        Self {
            endpoint: &subscription.endpoint,
            keys: SubscribeKeys {
                p256dh: &subscription.keys.p256dh,
                auth: &subscription.keys.auth,
            },
        }
    }
}

/// Body of `DELETE /notifications/subscribe`.
#[derive(Debug, Serialize)]
pub struct UnsubscribeRequest<'a> {
    pub endpoint: &'a str,
}
