//! In-memory artifact index

use super::ArtifactIndex;
use crate::error::Result;
use crate::types::Artifact;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Process-local index guarded by a mutex
///
/// Lookups take the same lock as stores because a hit writes the
/// served-from-cache mark. The lock is only held for the map operation itself.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    entries: Mutex<HashMap<String, Artifact>>,
}

impl MemoryIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index pre-populated with `entries`, keyed by source URL
    pub fn with_entries(entries: HashMap<String, Artifact>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, url: &str) -> bool {
        self.entries().contains_key(url)
    }

    // A panic while holding the lock cannot leave a half-written entry behind:
    // every critical section is a single map call.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Artifact>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ArtifactIndex for MemoryIndex {
    fn lookup(&self, url: &str) -> Option<Artifact> {
        let mut entries = self.entries();
        let artifact = entries.get_mut(url)?;
        artifact.retrieved_from_cache = true;
        Some(artifact.clone())
    }

    fn store(&self, url: &str, artifact: Artifact) -> Result<()> {
        self.entries().insert(url.to_string(), artifact);
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries().len()
    }
}
