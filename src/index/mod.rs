//! Artifact index: source URL to artifact metadata
//!
//! The index is consulted on every request and written once per successful
//! download. Implementations are shared between concurrent requests and must
//! make each `lookup` and `store` atomic; they are never held across a
//! network call.

mod memory;

pub use memory::MemoryIndex;

use crate::error::Result;
use crate::types::Artifact;

/// Key-value mapping from source URL to artifact
pub trait ArtifactIndex: Send + Sync {
    /// Look up the artifact stored for `url`
    ///
    /// A hit marks the entry as served from cache and returns it with
    /// `retrieved_from_cache` set; every later hit reports the same. A miss is
    /// `None`, never an error.
    fn lookup(&self, url: &str) -> Option<Artifact>;

    /// Insert or replace the artifact stored for `url`
    ///
    /// Overwriting an existing key is allowed and the last writer wins.
    fn store(&self, url: &str, artifact: Artifact) -> Result<()>;

    /// Number of stored entries
    fn len(&self) -> usize;

    /// Whether the index holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
