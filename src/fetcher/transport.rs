//! Outbound HTTP transport used to reach artifact origins

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::fmt;

/// Response head plus a streaming body from an origin
pub struct RemoteResponse {
    /// Status code returned by the origin
    pub status: reqwest::StatusCode,
    /// Reason phrase as sent by the origin, when it differs from the
    /// canonical one for `status`
    pub reason: Option<String>,
    /// Declared body length, `None` when the origin did not send one
    pub content_length: Option<u64>,
    /// Body chunks; an error means the connection broke mid-transfer
    pub body: BoxStream<'static, std::io::Result<Bytes>>,
}

impl fmt::Debug for RemoteResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteResponse")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

impl RemoteResponse {
    /// Status line as the origin sent it, e.g. "404 Not Found"
    ///
    /// Falls back to the canonical reason phrase, or the bare code when there
    /// is none.
    pub fn status_line(&self) -> String {
        let reason = self
            .reason
            .as_deref()
            .or_else(|| self.status.canonical_reason())
            .unwrap_or("");
        format!("{} {}", self.status.as_str(), reason)
            .trim_end()
            .to_string()
    }
}

/// Issues GET requests against origins
///
/// Implementations only need to deliver the response; status checking, length
/// checking and cancellation are handled by the [`Fetcher`](super::Fetcher).
/// Dropping the returned future or body stream must abort the request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a GET request for `url`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when no response could be obtained.
    async fn get(&self, url: &str) -> Result<RemoteResponse>;
}

/// [`Transport`] backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client from fetch settings
    ///
    /// The overall download deadline is applied by the fetcher, so only the
    /// connect timeout is set on the client.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client))
    }

    /// Use an already configured client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RemoteResponse> {
        let response = self.client.get(url).send().await.map_err(|e| {
            let reason = if e.is_connect() {
                format!("connection failed: {}", e)
            } else if e.is_builder() {
                format!("invalid request: {}", e)
            } else {
                e.to_string()
            };
            Error::Transport {
                url: url.to_string(),
                reason,
            }
        })?;

        let status = response.status();
        let reason = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned());
        let content_length = response.content_length();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other))
            .boxed();

        Ok(RemoteResponse {
            status,
            reason,
            content_length,
            body,
        })
    }
}
