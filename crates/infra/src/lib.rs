//! # Inventaire Infra
//!
//! Infrastructure adapters behind the core ports:
//! - SQLite-backed item/category/user storage with a push-style item feed
//! - The live feed worker (subscription lifecycle)
//! - Local auth service (session identities)
//! - Offline shell asset cache
//! - Configuration loading

pub mod auth;
pub mod config;
pub mod database;
pub mod feed;
pub mod shell;

pub use auth::AuthService;
pub use database::{DbManager, SqliteInventoryStore};
pub use feed::ItemFeedWorker;
pub use shell::{AssetSource, HttpAssetSource, ShellAsset, ShellCache};
