//! Cache-or-download orchestration

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{Fetcher, HttpTransport};
use crate::index::{ArtifactIndex, MemoryIndex};
use crate::storage::TempDirSink;
use crate::types::Artifact;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Serves artifacts from the index, downloading them on a miss
///
/// Each call to [`get`](Self::get) is independent: nothing is retried, and two
/// concurrent misses for the same URL both download, with the index keeping
/// whichever store lands last.
pub struct ArtifactService {
    index: Arc<dyn ArtifactIndex>,
    fetcher: Fetcher,
}

impl ArtifactService {
    /// Compose a service from an index and a fetcher
    ///
    /// The fetcher should store into the same index, otherwise downloads are
    /// never served as hits.
    pub fn new(index: Arc<dyn ArtifactIndex>, fetcher: Fetcher) -> Self {
        Self { index, fetcher }
    }

    /// Build the production stack: reqwest transport, temp files under
    /// `storage.download_dir`, in-memory index
    pub fn from_config(config: &Config) -> Result<Self> {
        let index: Arc<dyn ArtifactIndex> = Arc::new(MemoryIndex::new());
        let fetcher = Fetcher::new(
            Arc::new(HttpTransport::new(&config.fetch)?),
            Arc::new(TempDirSink::new(config.storage.download_dir.clone())),
            Arc::clone(&index),
            config.fetch.timeout,
        );
        Ok(Self::new(index, fetcher))
    }

    /// Return the artifact for `url`, fetching it from the origin on a miss
    ///
    /// A hit returns the indexed artifact with `retrieved_from_cache` set and
    /// never touches the network. A miss downloads under `prefix`; the result
    /// has `retrieved_from_cache == false`. A download that succeeded but
    /// could not be indexed is still returned.
    ///
    /// # Errors
    ///
    /// Any download failure, see [`Fetcher::download`].
    pub async fn get(
        &self,
        prefix: &str,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Artifact> {
        if let Some(artifact) = self.index.lookup(url) {
            debug!(url, prefix, name = %artifact.name, "artifact served from cache");
            return Ok(artifact);
        }

        let fetched = self.fetcher.download(prefix, url, cancel).await?;
        if let Some(e) = &fetched.index_error {
            warn!(url, error = %e, "serving artifact that was not cached");
        }

        info!(artifact = ?fetched.artifact.summary(), "artifact downloaded");
        Ok(fetched.artifact)
    }

    /// The index backing this service
    pub fn index(&self) -> &Arc<dyn ArtifactIndex> {
        &self.index
    }
}
