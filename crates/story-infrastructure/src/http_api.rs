//! reqwest-based implementation of [`StoryApi`].

use crate::dto::{
    IntoEnvelope, LoginResponse, MessageResponse, StoriesResponse, StoryResponse,
    SubscribeRequest, UnsubscribeRequest,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use story_core::api::StoryApi;
use story_core::config::ApiSettings;
use story_core::error::{Result, StoryError};
use story_core::push::PushSubscription;
use story_core::session::{Credentials, Registration, Session};
use story_core::story::{Envelope, NewStory, Story, StoryQuery};

/// HTTP client for the Story Share backend.
#[derive(Clone)]
pub struct HttpStoryApi {
    client: Client,
    base_url: String,
}

impl HttpStoryApi {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, &settings.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/stories/{id}` with the id percent-encoded as one segment.
    fn story_url(&self, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url("/stories"))
            .map_err(|e| StoryError::config(format!("Invalid API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StoryError::config("API base URL cannot hold a path"))?
            .push(id);
        Ok(url)
    }

    fn authorized(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request and decodes the envelope body.
    ///
    /// Error responses (4xx/5xx) still carry a JSON envelope, so the body
    /// is decoded regardless of status. Only an undecodable body is a
    /// transport fault.
    async fn send<D, T>(&self, request: RequestBuilder, endpoint: &str) -> Result<Envelope<T>>
    where
        D: DeserializeOwned + IntoEnvelope<T>,
    {
        let response = request.send().await.map_err(|e| {
            tracing::error!("[HttpStoryApi] {} failed: {}", endpoint, e);
            StoryError::from(e)
        })?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<D>(&body) {
            Ok(decoded) => {
                let envelope = decoded.into_envelope()?;
                tracing::debug!(
                    "[HttpStoryApi] {} -> {} ({})",
                    endpoint,
                    status,
                    envelope.message()
                );
                Ok(envelope)
            }
            Err(e) => {
                tracing::error!("[HttpStoryApi] {} returned an undecodable body: {}", endpoint, e);
                if status.is_success() {
                    Err(StoryError::transport(format!("invalid response body: {}", e)))
                } else {
                    Err(StoryError::transport(format!("HTTP {}", status)))
                }
            }
        }
    }

    fn story_form(story: &NewStory) -> Result<Form> {
        let photo = Part::bytes(story.photo.bytes.clone())
            .file_name(story.photo.file_name.clone())
            .mime_str(&story.photo.mime_type)?;

        let mut form = Form::new()
            .text("description", story.description.clone())
            .part("photo", photo);

        if let Some(lat) = story.lat {
            form = form.text("lat", lat.to_string());
        }
        if let Some(lon) = story.lon {
            form = form.text("lon", lon.to_string());
        }
        Ok(form)
    }
}

fn query_pairs(query: &StoryQuery) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(page) = query.page {
        pairs.push(("page", page.to_string()));
    }
    if let Some(size) = query.size {
        pairs.push(("size", size.to_string()));
    }
    if query.with_location {
        pairs.push(("location", "1".to_string()));
    }
    pairs
}

#[async_trait]
impl StoryApi for HttpStoryApi {
    async fn register(&self, registration: &Registration) -> Result<Envelope<()>> {
        let request = self.client.post(self.url("/register")).json(registration);
        self.send::<MessageResponse, _>(request, "POST /register").await
    }

    async fn login(&self, credentials: &Credentials) -> Result<Envelope<Session>> {
        let request = self.client.post(self.url("/login")).json(credentials);
        self.send::<LoginResponse, _>(request, "POST /login").await
    }

    async fn get_stories(
        &self,
        token: Option<&str>,
        query: &StoryQuery,
    ) -> Result<Envelope<Vec<Story>>> {
        let request = self.client.get(self.url("/stories")).query(&query_pairs(query));
        let request = Self::authorized(request, token);
        self.send::<StoriesResponse, _>(request, "GET /stories").await
    }

    async fn get_story(&self, token: Option<&str>, id: &str) -> Result<Envelope<Story>> {
        let request = self.client.get(self.story_url(id)?);
        let request = Self::authorized(request, token);
        self.send::<StoryResponse, _>(request, "GET /stories/:id").await
    }

    async fn add_story(&self, token: Option<&str>, story: &NewStory) -> Result<Envelope<()>> {
        let form = Self::story_form(story)?;
        match token {
            Some(token) => {
                let request = self
                    .client
                    .post(self.url("/stories"))
                    .bearer_auth(token)
                    .multipart(form);
                self.send::<MessageResponse, _>(request, "POST /stories").await
            }
            None => {
                let request = self.client.post(self.url("/stories/guest")).multipart(form);
                self.send::<MessageResponse, _>(request, "POST /stories/guest")
                    .await
            }
        }
    }

    async fn subscribe_push(
        &self,
        token: &str,
        subscription: &PushSubscription,
    ) -> Result<Envelope<()>> {
        let request = self
            .client
            .post(self.url("/notifications/subscribe"))
            .bearer_auth(token)
            .json(&SubscribeRequest::from(subscription));
        self.send::<MessageResponse, _>(request, "POST /notifications/subscribe")
            .await
    }

    async fn unsubscribe_push(&self, token: &str, endpoint: &str) -> Result<Envelope<()>> {
        let request = self
            .client
            .delete(self.url("/notifications/subscribe"))
            .bearer_auth(token)
            .json(&UnsubscribeRequest { endpoint });
        self.send::<MessageResponse, _>(request, "DELETE /notifications/subscribe")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs() {
        let query = StoryQuery {
            page: Some(2),
            size: None,
            with_location: true,
        };
        assert_eq!(
            query_pairs(&query),
            vec![("page", "2".to_string()), ("location", "1".to_string())]
        );
        assert!(query_pairs(&StoryQuery::default()).is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpStoryApi::with_client(Client::new(), "http://localhost:9000/v1/");
        assert_eq!(api.url("/stories"), "http://localhost:9000/v1/stories");
    }

    #[test]
    fn test_story_id_is_one_encoded_segment() {
        let api = HttpStoryApi::with_client(Client::new(), "http://localhost:9000/v1");
        assert_eq!(
            api.story_url("story-42").unwrap().as_str(),
            "http://localhost:9000/v1/stories/story-42"
        );
        assert_eq!(
            api.story_url("a#b%c/d").unwrap().as_str(),
            "http://localhost:9000/v1/stories/a%23b%25c%2Fd"
        );
    }
}
