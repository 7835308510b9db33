//! Port interfaces for the external persistence and feed collaborator
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations. The external service owns the
//! items; the client only issues writes and consumes snapshots.

use async_trait::async_trait;
use inventaire_domain::{FeedEvent, FeedScope, ItemRecord, Result};
use tokio::sync::mpsc;

/// Trait for issuing item writes against the external store
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Create (identity `None`) or update (identity `Some`) an item.
    ///
    /// Returns the identity assigned by the store. The caller never applies
    /// the write locally; the change comes back through the feed.
    async fn write_item(&self, identity: Option<&str>, record: &ItemRecord) -> Result<String>;

    /// Delete an item by identity. Deleting an already-absent identity is
    /// not an error; the store's delete is idempotent.
    async fn delete_item(&self, identity: &str) -> Result<()>;
}

/// Trait for per-session category set persistence
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Read the category set for a session identity, seeding and returning
    /// the defaults when none is stored yet.
    async fn read_category_set(&self, session: &str) -> Result<Vec<String>>;

    /// Replace the stored category set for a session identity
    async fn write_category_set(&self, session: &str, categories: &[String]) -> Result<()>;
}

/// Trait for subscribing to the live item feed
#[async_trait]
pub trait ItemFeed: Send + Sync {
    /// Open a subscription scoped per the shared or per-session variant.
    ///
    /// The subscription delivers an initial snapshot followed by a full
    /// snapshot on every backing-store change. Dropping the subscription
    /// unsubscribes.
    async fn subscribe(&self, scope: FeedScope) -> Result<ItemSubscription>;
}

/// Handle to an open feed subscription
pub struct ItemSubscription {
    events: mpsc::Receiver<FeedEvent>,
}

impl ItemSubscription {
    /// Wrap a channel of feed events
    pub fn new(events: mpsc::Receiver<FeedEvent>) -> Self {
        Self { events }
    }

    /// Next feed event, or `None` once the feed side has closed
    pub async fn next(&mut self) -> Option<FeedEvent> {
        self.events.recv().await
    }
}
