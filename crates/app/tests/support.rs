use inventaire_app::context::AppContext;
use inventaire_domain::{Config, DatabaseConfig, FeedConfig, ItemDraft, Location};
use tempfile::TempDir;

/// Shared context for integration tests driving the full stack.
pub struct TestContext {
    /// Application context under test.
    pub ctx: AppContext,
    /// Keep temporary directory alive for the lifetime of the context.
    _temp_dir: TempDir,
}

/// Create a test context backed by a fresh database file.
pub fn setup_test_context() -> TestContext {
    inventaire_app::utils::logging::init_tracing();

    let temp_dir = TempDir::new().expect("failed to create temporary database directory");
    let db_path = temp_dir.path().join("inventaire.db");

    let config = Config {
        database: DatabaseConfig {
            path: db_path.to_string_lossy().to_string(),
            pool_size: 4,
        },
        feed: FeedConfig { channel_capacity: 8, join_timeout_secs: 2 },
        ..Config::default()
    };

    let ctx = AppContext::new(config).expect("failed to initialise AppContext");
    TestContext { ctx, _temp_dir: temp_dir }
}

/// A valid draft for a new chantier item.
pub fn draft(name: &str, quantity: &str) -> ItemDraft {
    ItemDraft {
        name: name.to_string(),
        category: "Visseuses".to_string(),
        quantity: quantity.to_string(),
        date: "2026-03-14".to_string(),
        site: "Lyon Part-Dieu".to_string(),
        team_leader: "Martin".to_string(),
        location: Some(Location::Chantier),
    }
}
