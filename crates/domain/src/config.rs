//! Application configuration structures

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub shell: ShellConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
    /// Connection pool size
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "inventaire.db".to_string(), pool_size: 5 }
    }
}

/// Live item feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Buffered snapshots per subscription before backpressure applies
    pub channel_capacity: usize,
    /// Join timeout when stopping the feed worker, in seconds
    pub join_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { channel_capacity: 16, join_timeout_secs: 5 }
    }
}

/// Offline shell cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Maximum number of cached shell assets
    pub max_assets: u64,
    /// Fixed manifest of shell asset paths served cache-first
    pub manifest: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            max_assets: 32,
            manifest: ["/", "/index.html", "/style.css", "/main.js", "/manifest.json"]
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}
