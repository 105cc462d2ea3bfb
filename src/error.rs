//! Error types for artifact-cache
//!
//! This module provides the error taxonomy for the cache, including:
//! - Origin failures (transport, non-success status, short writes)
//! - Storage and index failures
//! - Deadline and cancellation outcomes of a download
//! - HTTP status code mapping for the serving layer

use std::time::Duration;
use thiserror::Error;

/// Result type alias for artifact-cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for artifact-cache
///
/// This is the primary error type used throughout the library. Variants carry
/// the artifact name or source URL they relate to so the display text alone is
/// enough to diagnose a failed request.
#[derive(Debug, Error)]
pub enum Error {
    /// The origin could not be reached (DNS, connection, TLS) or the
    /// connection broke while the body was being read
    #[error("failed to reach origin for {url}: {reason}")]
    Transport {
        /// The source URL being fetched
        url: String,
        /// Underlying transport failure
        reason: String,
    },

    /// The origin answered with a status other than 200
    #[error("failed to download artifact[{name}]: {status}")]
    RemoteStatus {
        /// Artifact name derived from the source URL
        name: String,
        /// Status line returned by the origin, e.g. "404 Not Found"
        status: String,
    },

    /// Number of bytes copied does not match the declared content length
    #[error("copied {written} bytes; expected {expected}")]
    ShortWrite {
        /// Bytes actually copied into the content sink
        written: u64,
        /// Content length declared by the origin
        expected: u64,
    },

    /// The configured content sink cannot create files
    #[error("create {name}: operation not supported")]
    StorageUnsupported {
        /// Name of the artifact that could not be created
        name: String,
    },

    /// Persisting artifact metadata into the index failed
    #[error("failed to index artifact {url}: {reason}")]
    IndexStore {
        /// Source URL used as the index key
        url: String,
        /// Why the store was rejected
        reason: String,
    },

    /// The download did not finish before its deadline
    #[error("download of {url} timed out after {}s", .after.as_secs())]
    Timeout {
        /// The source URL being fetched
        url: String,
        /// The deadline that elapsed
        after: Duration,
    },

    /// The download was cancelled by the caller
    #[error("download of {url} was cancelled")]
    Cancelled {
        /// The source URL being fetched
        url: String,
    },

    /// Request used a prefix that is not configured
    #[error("unknown artifact prefix: {0}")]
    UnknownPrefix(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "server.prefixes")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error came from the origin rather than from local storage
    /// or the caller
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. } | Error::RemoteStatus { .. } | Error::ShortWrite { .. }
        )
    }
}

/// Convert errors to HTTP status codes for API responses
///
/// Every failure of an artifact lookup surfaces as 500 with the error text as
/// body; only request-shape problems get a more specific status.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 404 Not Found - no such namespace
            Error::UnknownPrefix(_) => 404,

            // 400 Bad Request - invalid configuration input
            Error::Config { .. } => 400,

            // 500 Internal Server Error - everything an artifact lookup can return
            Error::Transport { .. }
            | Error::RemoteStatus { .. }
            | Error::ShortWrite { .. }
            | Error::StorageUnsupported { .. }
            | Error::IndexStore { .. }
            | Error::Timeout { .. }
            | Error::Cancelled { .. }
            | Error::Io(_)
            | Error::Serialization(_)
            | Error::ApiServerError(_)
            | Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Transport { .. } => "transport_error",
            Error::RemoteStatus { .. } => "remote_status",
            Error::ShortWrite { .. } => "short_write",
            Error::StorageUnsupported { .. } => "storage_unsupported",
            Error::IndexStore { .. } => "index_store",
            Error::Timeout { .. } => "timeout",
            Error::Cancelled { .. } => "cancelled",
            Error::UnknownPrefix(_) => "unknown_prefix",
            Error::Config { .. } => "config_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}
