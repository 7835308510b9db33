//! # Inventaire Domain
//!
//! Business domain types for the shared tool inventory.
//!
//! This crate contains:
//! - Domain data types (Item, ItemDraft, Location, feed events)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (default category set)
//!
//! ## Architecture
//! - No dependencies on other inventaire crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use constants::*;
pub use errors::*;
pub use types::*;
