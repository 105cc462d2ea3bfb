//! Configuration types for artifact-cache

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, path::PathBuf, time::Duration};

/// Where downloaded artifacts are materialized
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding downloaded artifact files (default: "./artifacts")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
        }
    }
}

/// Outbound origin fetch settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Deadline for a whole download, request and body copy (default: 60 seconds)
    #[serde(default = "default_fetch_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// Deadline for establishing the origin connection (default: 10 seconds)
    #[serde(default = "default_connect_timeout", with = "duration_serde")]
    pub connect_timeout: Duration,

    /// User-Agent sent to origins
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            connect_timeout: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Inbound HTTP server settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:9050)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Logical namespaces artifacts can be requested under
    /// (default: ["3rdparty", "internal"])
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            prefixes: default_prefixes(),
        }
    }
}

/// Main configuration for the artifact cache
///
/// Every section has defaults, so an empty JSON object is a valid config.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Content storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Origin fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read config file '{}': {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Check settings that serde cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.server.prefixes.is_empty() {
            return Err(Error::Config {
                message: "at least one artifact prefix is required".to_string(),
                key: Some("server.prefixes".to_string()),
            });
        }

        for prefix in &self.server.prefixes {
            // "health" would shadow the health check route
            if prefix.is_empty() || prefix.contains('/') || prefix == "health" {
                return Err(Error::Config {
                    message: format!("invalid artifact prefix '{}'", prefix),
                    key: Some("server.prefixes".to_string()),
                });
            }
        }

        if self.fetch.timeout.is_zero() {
            return Err(Error::Config {
                message: "fetch timeout must be greater than zero".to_string(),
                key: Some("fetch.timeout".to_string()),
            });
        }

        Ok(())
    }

    /// Whether `prefix` is one of the configured namespaces
    pub fn is_known_prefix(&self, prefix: &str) -> bool {
        self.server.prefixes.iter().any(|p| p == prefix)
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./artifacts")
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    format!("artifact-cache/{}", env!("CARGO_PKG_VERSION"))
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 9050))
}

fn default_prefixes() -> Vec<String> {
    vec!["3rdparty".to_string(), "internal".to_string()]
}

// Durations are written as whole seconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
