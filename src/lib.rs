//! # artifact-cache
//!
//! Pull-through cache for build artifacts. Clients ask for an artifact by its
//! origin URL under a namespace prefix; the first request downloads it from the
//! origin into local storage, later requests are answered from the index
//! without touching the network.
//!
//! ## Design Philosophy
//!
//! - **Trait seams** - origin transport, content storage and index are traits,
//!   so every layer can be swapped or faked
//! - **Nothing partial** - a download that fails, times out or is cancelled
//!   never becomes visible to readers
//! - **Sensible defaults** - an empty config file is a working config
//!
//! ## Quick Start
//!
//! ```no_run
//! use artifact_cache::{ArtifactService, Config};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let service = ArtifactService::from_config(&config)?;
//!
//!     let artifact = service
//!         .get("3rdparty", "https://example.com/mkl.zip", &CancellationToken::new())
//!         .await?;
//!     println!("{} ({} bytes)", artifact.name, artifact.content.metadata().len);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP server
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Origin downloads
pub mod fetcher;
/// Artifact index
pub mod index;
/// Cache-or-download orchestration
pub mod service;
/// Content storage backends
pub mod storage;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{Config, FetchConfig, ServerConfig, StorageConfig};
pub use error::{Error, Result, ToHttpStatus};
pub use fetcher::{Fetcher, HttpTransport, RemoteResponse, Transport};
pub use index::{ArtifactIndex, MemoryIndex};
pub use service::ArtifactService;
pub use storage::{
    Content, ContentMetadata, ContentReader, ContentSink, ContentWriter, DiskContent,
    MemoryContent, MemorySink, TempDirSink,
};
pub use types::{Artifact, ArtifactSummary, Fetched};
