//! # Inventaire Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the external persistence service
//! - The view/filter/edit controller and its pure row projection
//! - CSV export
//!
//! ## Architecture Principles
//! - Only depends on `inventaire-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod export;
pub mod inventory;

// Re-export specific items to avoid ambiguity
pub use inventory::controller::{InventoryController, RenameOutcome, RenderedView};
pub use inventory::ports::{CategoryStore, ItemFeed, ItemStore, ItemSubscription};
pub use inventory::view::{Filters, UiState, ALL_OPTION};
