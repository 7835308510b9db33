//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Inventaire
///
/// Every failure path maps to one of these kinds; all of them are terminal
/// and local. Callers surface the message and keep their previous state.
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum InventaireError {
    /// Bad user input; blocks the action, state unchanged
    #[error("Validation error: {0}")]
    Validation(String),

    /// Credential rejected or auth backend unavailable
    #[error("Authentication error: {0}")]
    Auth(String),

    /// External write failed; local state left as before the attempt
    #[error("Write error: {0}")]
    Write(String),

    /// Subscription failed or dropped; last-known collection retained
    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Inventaire operations
pub type Result<T> = std::result::Result<T, InventaireError>;
