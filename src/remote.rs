//! Remote exchange abstraction
//!
//! The single I/O boundary of the client: one JSON-over-HTTP content
//! resource and one chat resource.

mod error;
mod http;
mod types;

pub use error::{RemoteError, RemoteErrorKind};
pub use http::HttpRemote;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Common interface for the remote store
#[async_trait]
pub trait RemoteExchange: Send + Sync {
    /// `GET /content`
    async fn list_content(&self) -> Result<Vec<ContentRecord>, RemoteError>;

    /// `POST /content`
    async fn create_content(&self, draft: &ContentDraft) -> Result<(), RemoteError>;

    /// `PUT /content/{id}`
    async fn update_content(&self, id: RecordId, draft: &ContentDraft) -> Result<(), RemoteError>;

    /// `DELETE /content/{id}`
    async fn delete_content(&self, id: RecordId) -> Result<(), RemoteError>;

    /// `POST /chat`, returning the reply's `response` text
    async fn chat(&self, message: &str) -> Result<String, RemoteError>;
}

#[async_trait]
impl<T: RemoteExchange + ?Sized> RemoteExchange for Arc<T> {
    async fn list_content(&self) -> Result<Vec<ContentRecord>, RemoteError> {
        (**self).list_content().await
    }

    async fn create_content(&self, draft: &ContentDraft) -> Result<(), RemoteError> {
        (**self).create_content(draft).await
    }

    async fn update_content(&self, id: RecordId, draft: &ContentDraft) -> Result<(), RemoteError> {
        (**self).update_content(id, draft).await
    }

    async fn delete_content(&self, id: RecordId) -> Result<(), RemoteError> {
        (**self).delete_content(id).await
    }

    async fn chat(&self, message: &str) -> Result<String, RemoteError> {
        (**self).chat(message).await
    }
}

/// Logging wrapper for a remote exchange
pub struct LoggingRemote<R> {
    inner: R,
}

impl<R: RemoteExchange> LoggingRemote<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    fn record<T>(operation: &'static str, started: Instant, result: &Result<T, RemoteError>) {
        let duration = started.elapsed();
        match result {
            Ok(_) => {
                tracing::info!(
                    operation,
                    duration_ms = %duration.as_millis(),
                    "Remote call completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    operation,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.label(),
                    error = %e.message,
                    "Remote call failed"
                );
            }
        }
    }
}

#[async_trait]
impl<R: RemoteExchange> RemoteExchange for LoggingRemote<R> {
    async fn list_content(&self) -> Result<Vec<ContentRecord>, RemoteError> {
        let start = Instant::now();
        let result = self.inner.list_content().await;
        if let Ok(records) = &result {
            tracing::debug!(count = records.len(), "Fetched content list");
        }
        Self::record("list_content", start, &result);
        result
    }

    async fn create_content(&self, draft: &ContentDraft) -> Result<(), RemoteError> {
        let start = Instant::now();
        let result = self.inner.create_content(draft).await;
        Self::record("create_content", start, &result);
        result
    }

    async fn update_content(&self, id: RecordId, draft: &ContentDraft) -> Result<(), RemoteError> {
        tracing::debug!(record_id = %id, "Issuing update");
        let start = Instant::now();
        let result = self.inner.update_content(id, draft).await;
        Self::record("update_content", start, &result);
        result
    }

    async fn delete_content(&self, id: RecordId) -> Result<(), RemoteError> {
        tracing::debug!(record_id = %id, "Issuing delete");
        let start = Instant::now();
        let result = self.inner.delete_content(id).await;
        Self::record("delete_content", start, &result);
        result
    }

    async fn chat(&self, message: &str) -> Result<String, RemoteError> {
        let start = Instant::now();
        let result = self.inner.chat(message).await;
        Self::record("chat", start, &result);
        result
    }
}
