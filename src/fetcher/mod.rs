//! Download path: origin response to stored, indexed artifact
//!
//! A download runs in this order:
//! 1. refuse early if the content sink cannot create files
//! 2. GET the source URL through the [`Transport`]
//! 3. reject anything but `200 OK`
//! 4. stream the body into a new [`ContentWriter`](crate::storage::ContentWriter)
//! 5. compare the byte count with the declared content length
//! 6. seal the content, build the [`Artifact`] and store it in the index
//!
//! Steps 2-5 run under the configured deadline and the caller's cancellation
//! token. The writer is dropped on every early exit, which closes it and keeps
//! partial content out of the index.

mod transport;

pub use transport::{HttpTransport, RemoteResponse, Transport};

use crate::error::{Error, Result};
use crate::index::ArtifactIndex;
use crate::storage::ContentSink;
use crate::types::{Artifact, Fetched};
use crate::utils::artifact_name;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Retrieves artifacts from their origin into a content sink
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    sink: Arc<dyn ContentSink>,
    index: Arc<dyn ArtifactIndex>,
    timeout: Duration,
}

impl Fetcher {
    /// Create a fetcher
    ///
    /// # Arguments
    ///
    /// * `transport` - issues the origin GET requests
    /// * `sink` - receives the downloaded bytes
    /// * `index` - where successful downloads are recorded
    /// * `timeout` - deadline for one whole download, body included
    pub fn new(
        transport: Arc<dyn Transport>,
        sink: Arc<dyn ContentSink>,
        index: Arc<dyn ArtifactIndex>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            sink,
            index,
            timeout,
        }
    }

    /// Download `url` and record it under `prefix`
    ///
    /// The returned artifact always has `retrieved_from_cache == false`. A
    /// failure to store it in the index does not fail the download; it is
    /// reported in [`Fetched::index_error`].
    ///
    /// # Errors
    ///
    /// - [`Error::StorageUnsupported`] before any request if the sink is read-only
    /// - [`Error::Transport`] if the origin cannot be reached or the body breaks off
    /// - [`Error::RemoteStatus`] for any status other than 200
    /// - [`Error::ShortWrite`] if the body length differs from the declared length
    /// - [`Error::Timeout`] / [`Error::Cancelled`] if the deadline passes or
    ///   `cancel` fires first
    pub async fn download(
        &self,
        prefix: &str,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Fetched> {
        let name = artifact_name(url);

        if !self.sink.supports_create() {
            return Err(Error::StorageUnsupported { name });
        }

        info!(url, prefix, name = %name, sink = self.sink.name(), "downloading artifact");

        let artifact = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(Error::Cancelled { url: url.to_string() });
            }
            result = tokio::time::timeout(self.timeout, self.fetch_into_sink(prefix, url, &name)) => {
                match result {
                    Ok(artifact) => artifact?,
                    Err(_) => {
                        return Err(Error::Timeout {
                            url: url.to_string(),
                            after: self.timeout,
                        });
                    }
                }
            }
        };

        let index_error = match self.index.store(url, artifact.clone()) {
            Ok(()) => None,
            Err(e) => {
                warn!(url, error = %e, "downloaded artifact could not be indexed");
                Some(e)
            }
        };

        Ok(Fetched {
            artifact,
            index_error,
        })
    }

    async fn fetch_into_sink(&self, prefix: &str, url: &str, name: &str) -> Result<Artifact> {
        let response = self.transport.get(url).await?;

        if response.status != reqwest::StatusCode::OK {
            return Err(Error::RemoteStatus {
                name: name.to_string(),
                status: response.status_line(),
            });
        }

        let mut writer = self.sink.create(name).await?;
        let mut body = response.body;
        let mut written: u64 = 0;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| Error::Transport {
                url: url.to_string(),
                reason: format!("body read failed after {} bytes: {}", written, e),
            })?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        if let Some(expected) = response.content_length
            && expected != written
        {
            return Err(Error::ShortWrite { written, expected });
        }

        let content = writer.finish().await?;
        debug!(url, bytes = written, "artifact content stored");

        Ok(Artifact::new(prefix, url, content))
    }
}
