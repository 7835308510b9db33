//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use inventaire_core::{CategoryStore, InventoryController, ItemFeed, ItemStore};
use inventaire_domain::{Config, FeedScope, InventaireError, Item, Result};
use inventaire_infra::database::SqliteInventoryStore;
use inventaire_infra::feed::worker::ItemCollection;
use inventaire_infra::{AuthService, DbManager, ItemFeedWorker};
use tokio::sync::watch;
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub store: Arc<SqliteInventoryStore>,
    pub auth: AuthService,
    session: Option<SessionContext>,
}

/// Everything scoped to one authenticated session.
///
/// Built at login, torn down at logout. Exactly one exists at a time,
/// which is what keeps the one-subscription-per-session invariant.
pub struct SessionContext {
    pub identity: String,
    pub controller: InventoryController,
    feed: ItemFeedWorker,
    snapshot: watch::Receiver<ItemCollection>,
}

impl SessionContext {
    /// Current item collection, cheap clone of the shared snapshot
    pub fn items(&self) -> ItemCollection {
        self.snapshot.borrow().clone()
    }

    /// Wait until the live collection satisfies `predicate`.
    ///
    /// Checks the current snapshot first, then every subsequent feed push
    /// until the deadline.
    pub async fn wait_for_items<F>(&mut self, timeout: Duration, predicate: F) -> Result<ItemCollection>
    where
        F: Fn(&[Item]) -> bool,
    {
        let wait = async {
            loop {
                let current = self.snapshot.borrow_and_update().clone();
                if predicate(&current) {
                    return Ok(current);
                }
                self.snapshot.changed().await.map_err(|_| {
                    InventaireError::Feed("item feed closed while waiting".to_string())
                })?;
            }
        };

        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| InventaireError::Feed("timed out waiting for item snapshot".to_string()))?
    }
}

impl AppContext {
    /// Wire up the database, store, and auth service. No session yet.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        let store = Arc::new(SqliteInventoryStore::new(Arc::clone(&db), &config.feed));
        let auth = AuthService::new(
            Arc::clone(&db),
            Arc::clone(&store) as Arc<dyn CategoryStore>,
        );

        info!("application context initialised");
        Ok(Self { config, db, store, auth, session: None })
    }

    /// Register a new account; does not open a session.
    pub async fn register(&self, email: &str, password: &str) -> Result<String> {
        self.auth.register(email, password).await
    }

    /// Authenticate and open a session: load the category set, build the
    /// controller, and start the live feed.
    ///
    /// Any previous session is closed first, so the feed subscription
    /// count never exceeds one.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        self.logout().await;

        let identity = self.auth.authenticate(email, password).await?;
        let categories = self.store.read_category_set(&identity).await?;

        let controller = InventoryController::new(
            identity.clone(),
            categories,
            Arc::clone(&self.store) as Arc<dyn ItemStore>,
            Arc::clone(&self.store) as Arc<dyn CategoryStore>,
        );

        let (mut feed, snapshot) = ItemFeedWorker::new(
            Arc::clone(&self.store) as Arc<dyn ItemFeed>,
            &self.config.feed,
        );
        feed.start(FeedScope::AllSessions).await?;

        self.session = Some(SessionContext { identity, controller, feed, snapshot });
        info!("session opened");
        Ok(())
    }

    /// Close the current session, stopping its feed. No-op when logged out.
    pub async fn logout(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.feed.stop().await;
            info!("session closed");
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Result<&SessionContext> {
        self.session
            .as_ref()
            .ok_or_else(|| InventaireError::Auth("no active session".to_string()))
    }

    pub fn session_mut(&mut self) -> Result<&mut SessionContext> {
        self.session
            .as_mut()
            .ok_or_else(|| InventaireError::Auth("no active session".to_string()))
    }
}
