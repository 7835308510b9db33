//! # Inventaire App
//!
//! Application layer - commands and session wiring.
//!
//! This crate contains:
//! - UI-facing commands (frontend → backend bridge)
//! - Application context (dependency injection)
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Exposes plain async commands for the embedding shell

pub mod commands;
pub mod context;
pub mod utils;

pub use commands::*;
pub use context::{AppContext, SessionContext};
