//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Which object store backs the cache bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Objects live in process memory and vanish on restart
    Memory,
    /// Objects live under `store_root/<bucket>/` on local disk
    Filesystem,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreBackend::Memory),
            "fs" | "filesystem" | "disk" => Ok(StoreBackend::Filesystem),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bucket holding the cache objects
    pub bucket: String,
    /// Object store implementation
    pub backend: StoreBackend,
    /// Root directory for the filesystem backend
    pub store_root: PathBuf,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BUCKET` - Bucket name (default: cache)
    /// - `STORE_BACKEND` - `memory` or `fs` (default: memory)
    /// - `STORE_ROOT` - Filesystem backend root (default: ./data)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    ///
    /// An unrecognised `STORE_BACKEND` falls back to memory with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let backend = match env::var("STORE_BACKEND") {
            Ok(raw) => raw.parse::<StoreBackend>().unwrap_or_else(|err: String| {
                tracing::warn!("{}, falling back to memory", err);
                StoreBackend::Memory
            }),
            Err(_) => defaults.backend,
        };

        Self {
            bucket: env::var("CACHE_BUCKET")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.bucket),
            backend,
            store_root: env::var("STORE_ROOT")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.store_root),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket: "cache".to_string(),
            backend: StoreBackend::Memory,
            store_root: PathBuf::from("./data"),
            server_port: 3000,
        }
    }
}
