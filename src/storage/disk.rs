//! Temp-file backed content storage

use super::{Content, ContentMetadata, ContentReader, ContentSink, ContentWriter};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::SystemTime;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Creates uniquely named files under a download directory
///
/// Each file is named after the artifact followed by a random suffix, so two
/// concurrent downloads of the same artifact never clobber each other. The
/// directory is created on first use.
#[derive(Debug, Clone)]
pub struct TempDirSink {
    root: PathBuf,
}

impl TempDirSink {
    /// Create a sink writing into `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ContentSink for TempDirSink {
    async fn create(&self, name: &str) -> Result<Box<dyn ContentWriter>> {
        tokio::fs::create_dir_all(&self.root).await?;

        let root = self.root.clone();
        let prefix = name.to_string();
        let temp = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new().prefix(&prefix).tempfile_in(&root)
        })
        .await
        .map_err(|e| Error::Other(format!("temp file task failed: {}", e)))??;

        let (file, path) = temp.into_parts();
        tracing::debug!(path = %path.display(), "created artifact file");

        Ok(Box::new(TempFileWriter {
            file: File::from_std(file),
            path,
        }))
    }

    fn name(&self) -> &'static str {
        "temp-dir"
    }
}

/// Open temp file being filled by a download
///
/// Holding the [`TempPath`] means the file is deleted if the writer is dropped
/// before [`ContentWriter::finish`].
struct TempFileWriter {
    file: File,
    path: TempPath,
}

impl AsyncWrite for TempFileWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.file).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.file).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.file).poll_shutdown(cx)
    }
}

#[async_trait]
impl ContentWriter for TempFileWriter {
    async fn finish(self: Box<Self>) -> Result<Arc<dyn Content>> {
        let TempFileWriter { mut file, path } = *self;

        file.flush().await?;
        file.sync_all().await?;
        let meta = file.metadata().await?;
        let metadata = ContentMetadata {
            len: meta.len(),
            modified: meta.modified().unwrap_or_else(|_| SystemTime::now()),
        };
        drop(file);

        let path = path.keep().map_err(|e| Error::Io(e.error))?;

        Ok(Arc::new(DiskContent { path, metadata }))
    }
}

/// Artifact content stored in a file
#[derive(Debug, Clone)]
pub struct DiskContent {
    path: PathBuf,
    metadata: ContentMetadata,
}

#[async_trait]
impl Content for DiskContent {
    async fn open(&self) -> Result<Box<dyn ContentReader>> {
        let file = File::open(&self.path).await?;
        Ok(Box::new(file))
    }

    fn metadata(&self) -> ContentMetadata {
        self.metadata
    }

    fn local_path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
