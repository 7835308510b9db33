//! Database connection manager
//!
//! Owns the r2d2 connection pool and runs schema migrations at
//! construction. All synchronous database work goes through
//! `get_connection` inside `spawn_blocking`.

use inventaire_domain::{InventaireError, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

const SCHEMA: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA busy_timeout = 5000;

    CREATE TABLE IF NOT EXISTS users (
        identity        TEXT PRIMARY KEY,
        email           TEXT NOT NULL UNIQUE,
        password_salt   TEXT NOT NULL,
        password_digest TEXT NOT NULL,
        created_at      INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS category_sets (
        owner           TEXT PRIMARY KEY,
        categories_json TEXT NOT NULL,
        updated_at      INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS items (
        identity    TEXT PRIMARY KEY,
        owner       TEXT NOT NULL,
        name        TEXT NOT NULL,
        category    TEXT NOT NULL,
        quantity    INTEGER NOT NULL,
        date        TEXT,
        site        TEXT,
        team_leader TEXT,
        location    TEXT NOT NULL,
        created_at  INTEGER NOT NULL,
        updated_at  INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_items_owner ON items(owner);
    CREATE INDEX IF NOT EXISTS idx_items_category ON items(category);
";

/// Pooled SQLite database manager
pub struct DbManager {
    pool: Pool<SqliteConnectionManager>,
}

impl DbManager {
    /// Open (or create) the database at `path` and run migrations.
    pub fn new(path: &str, pool_size: u32) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(pool_size.max(1)).build(manager).map_err(|e| {
            InventaireError::Database(format!("failed to build connection pool: {e}"))
        })?;

        let db = Self { pool };
        db.run_migrations()?;
        info!(path, pool_size, "database ready");
        Ok(db)
    }

    /// Checkout a pooled connection
    pub fn get_connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| InventaireError::Database(format!("failed to get connection: {e}")))
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| InventaireError::Database(format!("migration failed: {e}")))
    }
}
