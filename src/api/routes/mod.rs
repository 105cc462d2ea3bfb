//! Route handlers for the HTTP server
//!
//! Handlers are organized by domain:
//! - [`artifacts`] - Artifact retrieval through the cache
//! - [`system`] - Health

mod artifacts;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use artifacts::*;
pub use system::*;

/// Response header reporting whether the artifact came from the index
pub const CACHE_STATUS_HEADER: &str = "x-artifact-cache";
