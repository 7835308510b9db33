//! SQLite persistence layer

pub mod manager;
pub mod store;

pub use manager::DbManager;
pub use store::SqliteInventoryStore;
