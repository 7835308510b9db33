//! SQLite-backed inventory store
//!
//! Implements all three external-collaborator ports (`ItemStore`,
//! `CategoryStore`, `ItemFeed`) over one database. Every committed item
//! write fires an in-process change signal; each open subscription
//! re-queries the full item list on that signal and pushes it as an
//! authoritative snapshot, mirroring the external service's push semantics
//! (initial snapshot on subscribe, full replacement afterwards, no deltas).

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use inventaire_core::{CategoryStore, ItemFeed, ItemStore, ItemSubscription};
use inventaire_domain::constants::default_categories;
use inventaire_domain::{
    FeedConfig, FeedEvent, FeedScope, InventaireError, Item, ItemRecord, Location, Result,
};
use rusqlite::{params, OptionalExtension, Row};
use tokio::sync::{broadcast, mpsc};
use tokio::task;
use tracing::{debug, warn};
use uuid::Uuid;

use super::manager::DbManager;

const ITEM_COLUMNS: &str =
    "identity, owner, name, category, quantity, date, site, team_leader, location";

/// SQLite adapter for item, category, and feed ports
pub struct SqliteInventoryStore {
    db: Arc<DbManager>,
    changes: broadcast::Sender<()>,
    feed_capacity: usize,
}

impl SqliteInventoryStore {
    pub fn new(db: Arc<DbManager>, feed: &FeedConfig) -> Self {
        // Change signals are coalesceable: a lagged subscriber just
        // refreshes once, so a small buffer is enough.
        let (changes, _) = broadcast::channel(64);
        Self { db, changes, feed_capacity: feed.channel_capacity.max(1) }
    }

    fn notify_change(&self) {
        // No subscribers is fine; the send result only reports that.
        let _ = self.changes.send(());
    }

    async fn load_snapshot(db: &Arc<DbManager>, scope: &FeedScope) -> Result<Vec<Item>> {
        let db = Arc::clone(db);
        let scope = scope.clone();
        task::spawn_blocking(move || -> Result<Vec<Item>> {
            let conn = db.get_connection()?;
            let (sql, owner) = match &scope {
                FeedScope::AllSessions => (
                    format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at, identity"),
                    None,
                ),
                FeedScope::Session(owner) => (
                    format!(
                        "SELECT {ITEM_COLUMNS} FROM items WHERE owner = ?1 \
                         ORDER BY created_at, identity"
                    ),
                    Some(owner.clone()),
                ),
            };

            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| map_db_err("prepare item query", &e))?;

            match owner {
                Some(owner) => {
                    let mut rows = stmt
                        .query(params![owner])
                        .map_err(|e| map_db_err("query items", &e))?;
                    collect_items(&mut rows)
                }
                None => {
                    let mut rows =
                        stmt.query([]).map_err(|e| map_db_err("query items", &e))?;
                    collect_items(&mut rows)
                }
            }
        })
        .await
        .map_err(|e| InventaireError::Internal(format!("item query task failed: {e}")))?
    }
}

#[async_trait]
impl ItemStore for SqliteInventoryStore {
    async fn write_item(&self, identity: Option<&str>, record: &ItemRecord) -> Result<String> {
        let db = Arc::clone(&self.db);
        let record = record.clone();
        let identity = identity.map(str::to_string);

        let assigned = task::spawn_blocking(move || -> Result<String> {
            let conn = db.get_connection()?;
            let now = Utc::now().timestamp();

            match identity {
                Some(id) => {
                    let updated = conn
                        .execute(
                            "UPDATE items SET owner = ?1, name = ?2, category = ?3, \
                             quantity = ?4, date = ?5, site = ?6, team_leader = ?7, \
                             location = ?8, updated_at = ?9 WHERE identity = ?10",
                            params![
                                record.owner,
                                record.name,
                                record.category,
                                record.quantity,
                                record.date,
                                record.site,
                                record.team_leader,
                                record.location.as_str(),
                                now,
                                id
                            ],
                        )
                        .map_err(|e| map_db_err("update item", &e))?;

                    if updated == 0 {
                        return Err(InventaireError::NotFound(format!("item not found: {id}")));
                    }
                    Ok(id)
                }
                None => {
                    let id = Uuid::new_v4().to_string();
                    conn.execute(
                        "INSERT INTO items (identity, owner, name, category, quantity, \
                         date, site, team_leader, location, created_at, updated_at) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
                        params![
                            id,
                            record.owner,
                            record.name,
                            record.category,
                            record.quantity,
                            record.date,
                            record.site,
                            record.team_leader,
                            record.location.as_str(),
                            now
                        ],
                    )
                    .map_err(|e| map_db_err("insert item", &e))?;
                    Ok(id)
                }
            }
        })
        .await
        .map_err(|e| InventaireError::Internal(format!("item write task failed: {e}")))??;

        self.notify_change();
        Ok(assigned)
    }

    async fn delete_item(&self, identity: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let identity = identity.to_string();

        let deleted = task::spawn_blocking(move || -> Result<usize> {
            let conn = db.get_connection()?;
            conn.execute("DELETE FROM items WHERE identity = ?1", params![identity])
                .map_err(|e| map_db_err("delete item", &e))
        })
        .await
        .map_err(|e| InventaireError::Internal(format!("item delete task failed: {e}")))??;

        if deleted == 0 {
            // Idempotent: the row is already gone, likely another session.
            debug!("delete targeted an absent item");
        } else {
            self.notify_change();
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryStore for SqliteInventoryStore {
    async fn read_category_set(&self, session: &str) -> Result<Vec<String>> {
        let db = Arc::clone(&self.db);
        let session = session.to_string();

        task::spawn_blocking(move || -> Result<Vec<String>> {
            let conn = db.get_connection()?;
            let stored: Option<String> = conn
                .query_row(
                    "SELECT categories_json FROM category_sets WHERE owner = ?1",
                    params![session],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| map_db_err("read category set", &e))?;

            match stored {
                Some(json) => serde_json::from_str(&json).map_err(|e| {
                    InventaireError::Database(format!("corrupt category set: {e}"))
                }),
                None => {
                    // First session for this identity: seed the defaults.
                    let categories = default_categories();
                    let json = serde_json::to_string(&categories).map_err(|e| {
                        InventaireError::Internal(format!("serialize category set: {e}"))
                    })?;
                    conn.execute(
                        "INSERT OR REPLACE INTO category_sets \
                         (owner, categories_json, updated_at) VALUES (?1, ?2, ?3)",
                        params![session, json, Utc::now().timestamp()],
                    )
                    .map_err(|e| map_db_err("seed category set", &e))?;
                    Ok(categories)
                }
            }
        })
        .await
        .map_err(|e| InventaireError::Internal(format!("category read task failed: {e}")))?
    }

    async fn write_category_set(&self, session: &str, categories: &[String]) -> Result<()> {
        let db = Arc::clone(&self.db);
        let session = session.to_string();
        let json = serde_json::to_string(categories)
            .map_err(|e| InventaireError::Internal(format!("serialize category set: {e}")))?;

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT OR REPLACE INTO category_sets \
                 (owner, categories_json, updated_at) VALUES (?1, ?2, ?3)",
                params![session, json, Utc::now().timestamp()],
            )
            .map_err(|e| map_db_err("write category set", &e))?;
            Ok(())
        })
        .await
        .map_err(|e| InventaireError::Internal(format!("category write task failed: {e}")))?
    }
}

#[async_trait]
impl ItemFeed for SqliteInventoryStore {
    async fn subscribe(&self, scope: FeedScope) -> Result<ItemSubscription> {
        let (tx, rx) = mpsc::channel(self.feed_capacity);
        let mut changes = self.changes.subscribe();
        let db = Arc::clone(&self.db);

        tokio::spawn(async move {
            // Initial snapshot so the subscriber starts from the current
            // authoritative state.
            if !push_snapshot(&db, &scope, &tx).await {
                return;
            }

            loop {
                match changes.recv().await {
                    Ok(()) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Snapshots are full replacements, one refresh
                        // covers every skipped signal.
                        debug!(skipped, "feed change signal lagged, refreshing once");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("store dropped, closing feed subscription");
                        break;
                    }
                }

                if !push_snapshot(&db, &scope, &tx).await {
                    break;
                }
            }
        });

        Ok(ItemSubscription::new(rx))
    }
}

/// Query and deliver one snapshot; `false` when the subscriber is gone.
async fn push_snapshot(
    db: &Arc<DbManager>,
    scope: &FeedScope,
    tx: &mpsc::Sender<FeedEvent>,
) -> bool {
    let event = match SqliteInventoryStore::load_snapshot(db, scope).await {
        Ok(items) => FeedEvent::Snapshot(items),
        Err(err) => {
            warn!(error = %err, "item snapshot query failed");
            FeedEvent::Error(err.to_string())
        }
    };
    tx.send(event).await.is_ok()
}

fn collect_items(rows: &mut rusqlite::Rows<'_>) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    while let Some(row) = rows.next().map_err(|e| map_db_err("read item row", &e))? {
        items.push(item_from_row(row)?);
    }
    Ok(items)
}

fn item_from_row(row: &Row<'_>) -> Result<Item> {
    let location: String = row.get(8).map_err(|e| map_db_err("read location", &e))?;
    Ok(Item {
        identity: row.get(0).map_err(|e| map_db_err("read identity", &e))?,
        owner: row.get(1).map_err(|e| map_db_err("read owner", &e))?,
        name: row.get(2).map_err(|e| map_db_err("read name", &e))?,
        category: row.get(3).map_err(|e| map_db_err("read category", &e))?,
        quantity: row.get(4).map_err(|e| map_db_err("read quantity", &e))?,
        date: row.get(5).map_err(|e| map_db_err("read date", &e))?,
        site: row.get(6).map_err(|e| map_db_err("read site", &e))?,
        team_leader: row.get(7).map_err(|e| map_db_err("read team_leader", &e))?,
        location: Location::from_str(&location)
            .map_err(|_| InventaireError::Database(format!("corrupt location: {location}")))?,
    })
}

fn map_db_err(context: &str, err: &rusqlite::Error) -> InventaireError {
    InventaireError::Database(format!("{context} failed: {err}"))
}
