//! In-memory content storage

use super::{Content, ContentMetadata, ContentReader, ContentSink, ContentWriter};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::SystemTime;
use tokio::io::AsyncWrite;

/// Keeps artifact content in memory
///
/// Finished contents are remembered by name (last one wins) so tests can
/// inspect what reached the sink. A sink built with [`MemorySink::read_only`]
/// refuses to create anything.
#[derive(Debug, Default)]
pub struct MemorySink {
    read_only: bool,
    finished: Arc<Mutex<HashMap<String, Arc<MemoryContent>>>>,
}

impl MemorySink {
    /// Create a writable in-memory sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that rejects every `create` call
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Content most recently finished under `name`
    pub fn get(&self, name: &str) -> Option<Arc<MemoryContent>> {
        self.finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Number of distinct names that have finished content
    pub fn len(&self) -> usize {
        self.finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been finished yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContentSink for MemorySink {
    async fn create(&self, name: &str) -> Result<Box<dyn ContentWriter>> {
        if self.read_only {
            return Err(Error::StorageUnsupported {
                name: name.to_string(),
            });
        }

        Ok(Box::new(MemoryWriter {
            name: name.to_string(),
            buf: Vec::new(),
            finished: Arc::clone(&self.finished),
        }))
    }

    fn supports_create(&self) -> bool {
        !self.read_only
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

struct MemoryWriter {
    name: String,
    buf: Vec<u8>,
    finished: Arc<Mutex<HashMap<String, Arc<MemoryContent>>>>,
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.buf).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.buf).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.buf).poll_shutdown(cx)
    }
}

#[async_trait]
impl ContentWriter for MemoryWriter {
    async fn finish(self: Box<Self>) -> Result<Arc<dyn Content>> {
        let MemoryWriter {
            name,
            buf,
            finished,
        } = *self;

        let content = Arc::new(MemoryContent::new(buf));
        finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::clone(&content));

        Ok(content)
    }
}

/// Artifact content held in memory
#[derive(Debug, Clone)]
pub struct MemoryContent {
    bytes: Arc<[u8]>,
    modified: SystemTime,
}

impl MemoryContent {
    /// Wrap `bytes`, stamped with the current time
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            bytes: Arc::from(bytes),
            modified: SystemTime::now(),
        }
    }

    /// The stored bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[async_trait]
impl Content for MemoryContent {
    async fn open(&self) -> Result<Box<dyn ContentReader>> {
        Ok(Box::new(Cursor::new(Arc::clone(&self.bytes))))
    }

    fn metadata(&self) -> ContentMetadata {
        ContentMetadata {
            len: self.bytes.len() as u64,
            modified: self.modified,
        }
    }
}
