//! Live item feed types
//!
//! The feed delivers full-collection snapshots on every backing-store
//! change; there are no deltas. Events are at-least-once and not strictly
//! ordered by write; the last event applied wins.

use serde::{Deserialize, Serialize};

use crate::types::item::Item;

/// Scope of a feed subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedScope {
    /// All sessions' items, read-only beyond the caller's own (shared variant)
    AllSessions,
    /// Only the given session's items (per-user variant)
    Session(String),
}

/// A single event pushed by the feed
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Authoritative full replacement of the item collection
    Snapshot(Vec<Item>),
    /// Feed-side failure; the last known collection stays in place
    Error(String),
}
