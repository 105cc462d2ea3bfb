//! Content storage for downloaded artifacts
//!
//! A [`ContentSink`] creates named [`ContentWriter`]s. The fetcher streams an
//! origin response into a writer and seals it with [`ContentWriter::finish`],
//! which yields a shareable [`Content`] handle that readers can open any number
//! of times.
//!
//! Two sinks are provided:
//! - [`TempDirSink`] - uniquely named files under a download directory
//! - [`MemorySink`] - in-memory buffers, for tests and embedding

mod disk;
mod memory;

pub use disk::{DiskContent, TempDirSink};
pub use memory::{MemoryContent, MemorySink};

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::io::{AsyncRead, AsyncSeek, AsyncWrite};

/// Size and modification time of stored content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentMetadata {
    /// Length in bytes
    pub len: u64,
    /// When the content was last written
    pub modified: SystemTime,
}

/// Byte storage that can create new named artifact files
///
/// Implementations hold no caching logic. Cleanup of created files is left to
/// whoever owns the storage location.
#[async_trait]
pub trait ContentSink: Send + Sync {
    /// Create a new writable handle for the artifact called `name`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StorageUnsupported`] if this sink cannot create
    /// files, or an I/O error if creation fails.
    async fn create(&self, name: &str) -> Result<Box<dyn ContentWriter>>;

    /// Whether [`create`](Self::create) can succeed at all
    ///
    /// Checked before any network traffic so a read-only sink never triggers a
    /// download.
    fn supports_create(&self) -> bool {
        true
    }

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Writable side of a content handle
///
/// Dropping a writer without calling [`finish`](Self::finish) closes it and
/// discards what was written, so a partial download never becomes readable.
#[async_trait]
pub trait ContentWriter: AsyncWrite + Send + Unpin {
    /// Flush everything written so far and turn the handle into readable content
    async fn finish(self: Box<Self>) -> Result<Arc<dyn Content>>;
}

/// Readable stream over stored content
pub trait ContentReader: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> ContentReader for T {}

/// Sealed, readable artifact content
#[async_trait]
pub trait Content: Send + Sync + fmt::Debug {
    /// Open an independent reader positioned at the start of the content
    async fn open(&self) -> Result<Box<dyn ContentReader>>;

    /// Size and modification time
    fn metadata(&self) -> ContentMetadata;

    /// Path of the backing file, if the content lives on a filesystem
    fn local_path(&self) -> Option<&Path> {
        None
    }
}
