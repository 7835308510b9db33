//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `INVENTAIRE_DB_PATH`: Database file path (required)
//! - `INVENTAIRE_DB_POOL_SIZE`: Connection pool size (required)
//! - `INVENTAIRE_FEED_CAPACITY`: Buffered snapshots per feed subscription
//! - `INVENTAIRE_FEED_JOIN_TIMEOUT`: Feed worker stop timeout in seconds
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `inventaire.{json,toml}` in
//! the working directory, up to two parent directories, and next to the
//! executable.

use std::path::{Path, PathBuf};

use inventaire_domain::{
    Config, DatabaseConfig, FeedConfig, InventaireError, Result, ShellConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `InventaireError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> Result<Config> {
    // Pick up a local .env before probing the environment
    let _ = dotenvy::dotenv();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The database variables are required; feed tuning variables fall back
/// to their defaults. The shell manifest is not configurable through the
/// environment.
///
/// # Errors
/// Returns `InventaireError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("INVENTAIRE_DB_PATH")?;
    let db_pool_size = env_var("INVENTAIRE_DB_POOL_SIZE").and_then(|s| {
        s.parse::<u32>().map_err(|e| InventaireError::Config(format!("Invalid pool size: {e}")))
    })?;

    let defaults = FeedConfig::default();
    let feed_capacity = env_parse("INVENTAIRE_FEED_CAPACITY", defaults.channel_capacity)?;
    let feed_join_timeout = env_parse("INVENTAIRE_FEED_JOIN_TIMEOUT", defaults.join_timeout_secs)?;

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        feed: FeedConfig {
            channel_capacity: feed_capacity,
            join_timeout_secs: feed_join_timeout,
        },
        shell: ShellConfig::default(),
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `InventaireError::Config` if no file is found or the file
/// cannot be parsed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(InventaireError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            InventaireError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| InventaireError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| InventaireError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| InventaireError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(InventaireError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("inventaire.json"),
            cwd.join("inventaire.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("inventaire.json"),
                exe_dir.join("inventaire.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        InventaireError::Config(format!("Missing required environment variable: {key}"))
    })
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| InventaireError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
