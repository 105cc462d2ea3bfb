//! Core types shared by the index, fetcher and service

use crate::storage::Content;
use crate::utils::{artifact_name, file_extension};
use serde::Serialize;
use std::sync::Arc;

/// One fetched or cached unit of content
///
/// The source URL is the sole cache identity. `prefix` only records the
/// namespace the artifact was first requested under, so a later request for the
/// same URL under a different prefix sees the original prefix.
///
/// Clones share the same content handle.
#[derive(Clone, Debug)]
pub struct Artifact {
    /// Final path segment of the source URL (e.g. "mkl.zip")
    pub name: String,
    /// Suffix of the name including the dot (e.g. ".zip"), empty if none
    pub file_extension: String,
    /// URL the artifact was fetched from; the cache key
    pub source_url: String,
    /// Namespace the artifact was requested under (e.g. "3rdparty")
    pub prefix: String,
    /// Handle to the bytes, owned by the content sink that produced it
    pub content: Arc<dyn Content>,
    /// True only when this value was returned by an index hit
    pub retrieved_from_cache: bool,
}

impl Artifact {
    /// Build a freshly downloaded artifact, deriving name and extension from
    /// `source_url`
    pub fn new(prefix: &str, source_url: &str, content: Arc<dyn Content>) -> Self {
        let name = artifact_name(source_url);
        let file_extension = file_extension(&name);
        Self {
            name,
            file_extension,
            source_url: source_url.to_string(),
            prefix: prefix.to_string(),
            content,
            retrieved_from_cache: false,
        }
    }

    /// Metadata view without the content handle
    pub fn summary(&self) -> ArtifactSummary {
        let metadata = self.content.metadata();
        ArtifactSummary {
            name: self.name.clone(),
            file_extension: self.file_extension.clone(),
            source_url: self.source_url.clone(),
            prefix: self.prefix.clone(),
            size_bytes: metadata.len,
            retrieved_from_cache: self.retrieved_from_cache,
        }
    }
}

/// Serializable description of an artifact, used for logging and reporting
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    /// Artifact name
    pub name: String,
    /// File extension including the dot
    pub file_extension: String,
    /// Source URL (cache key)
    pub source_url: String,
    /// Namespace the artifact was first requested under
    #[serde(rename = "type")]
    pub prefix: String,
    /// Size of the stored content
    pub size_bytes: u64,
    /// Whether this value came from the index
    pub retrieved_from_cache: bool,
}

/// Outcome of a download that completed successfully
///
/// The artifact is usable even when `index_error` is set: the bytes are on the
/// content sink, only the index entry is missing.
#[derive(Debug)]
pub struct Fetched {
    /// The downloaded artifact, `retrieved_from_cache` is always false
    pub artifact: Artifact,
    /// Non-fatal failure to persist the artifact into the index
    pub index_error: Option<crate::Error>,
}
