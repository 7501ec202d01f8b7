//! reqwest-backed remote store

use super::{ChatReply, ChatRequest, ContentDraft, ContentRecord, RecordId, RemoteError, RemoteExchange};
use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::{Client, Response};

/// HTTP implementation of [`RemoteExchange`]
pub struct HttpRemote {
    client: Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(config: &ClientConfig) -> Result<Self, RemoteError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RemoteError::transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn record_url(&self, id: RecordId) -> String {
        self.url(&format!("/content/{id}"))
    }

    /// Turn a non-2xx response into a rejection, keeping the body for logs
    async fn check_status(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::rejected(
            status.as_u16(),
            format!("Remote store returned {status}: {body}"),
        ))
    }
}

#[async_trait]
impl RemoteExchange for HttpRemote {
    async fn list_content(&self) -> Result<Vec<ContentRecord>, RemoteError> {
        let response = self.client.get(self.url("/content")).send().await?;
        let response = Self::check_status(response).await?;
        response
            .json::<Vec<ContentRecord>>()
            .await
            .map_err(|e| RemoteError::malformed(format!("Unexpected content list: {e}")))
    }

    async fn create_content(&self, draft: &ContentDraft) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(self.url("/content"))
            .json(draft)
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn update_content(&self, id: RecordId, draft: &ContentDraft) -> Result<(), RemoteError> {
        let response = self
            .client
            .put(self.record_url(id))
            .json(draft)
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn delete_content(&self, id: RecordId) -> Result<(), RemoteError> {
        let response = self.client.delete(self.record_url(id)).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn chat(&self, message: &str) -> Result<String, RemoteError> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        let response = self.client.post(self.url("/chat")).json(&body).send().await?;
        let response = Self::check_status(response).await?;
        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| RemoteError::malformed(format!("Unexpected chat reply: {e}")))?;
        reply
            .response
            .ok_or_else(|| RemoteError::malformed("Chat reply has no `response` field"))
    }
}
