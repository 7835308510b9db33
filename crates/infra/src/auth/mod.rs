//! Local account and session management
//!
//! Accounts live in the `users` table with a salted SHA-256 password
//! digest. Authentication yields the user identity that scopes every
//! item write for the rest of the session.

use std::sync::Arc;

use inventaire_core::CategoryStore;
use inventaire_domain::{default_categories, InventaireError, Result};
use rand::RngCore;
use rusqlite::OptionalExtension;
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use crate::database::DbManager;

const MIN_PASSWORD_LEN: usize = 6;

/// Account registration and credential verification
pub struct AuthService {
    db: Arc<DbManager>,
    categories: Arc<dyn CategoryStore>,
}

impl AuthService {
    pub fn new(db: Arc<DbManager>, categories: Arc<dyn CategoryStore>) -> Self {
        Self { db, categories }
    }

    /// Register a new account and seed its default category set.
    ///
    /// Returns the new user identity. Duplicate emails are rejected.
    pub async fn register(&self, email: &str, password: &str) -> Result<String> {
        let email = normalize_email(email)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(InventaireError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = hash_password(&salt, password);
        let salt_hex = hex::encode(salt);
        let identity = Uuid::new_v4().to_string();

        let db = Arc::clone(&self.db);
        let insert_email = email.clone();
        let insert_identity = identity.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let existing: Option<String> = conn
                .query_row(
                    "SELECT identity FROM users WHERE email = ?1",
                    [&insert_email],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_db_err)?;
            if existing.is_some() {
                return Err(InventaireError::Auth("email already registered".to_string()));
            }

            conn.execute(
                "INSERT INTO users (identity, email, password_salt, password_digest, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    insert_identity,
                    insert_email,
                    salt_hex,
                    digest,
                    chrono::Utc::now().timestamp()
                ],
            )
            .map_err(map_db_err)?;
            Ok(())
        })
        .await
        .map_err(|e| InventaireError::Internal(format!("register task failed: {e}")))??;

        self.categories.write_category_set(&identity, &default_categories()).await?;

        info!(email = %email, "account registered");
        Ok(identity)
    }

    /// Verify credentials and return the user identity.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String> {
        let email = normalize_email(email)?;
        let password = password.to_string();

        let db = Arc::clone(&self.db);
        let identity = tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let row: Option<(String, String, String)> = conn
                .query_row(
                    "SELECT identity, password_salt, password_digest FROM users WHERE email = ?1",
                    [&email],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .optional()
                .map_err(map_db_err)?;

            let Some((identity, salt_hex, digest)) = row else {
                return Err(InventaireError::Auth("invalid credentials".to_string()));
            };
            let salt = hex::decode(&salt_hex)
                .map_err(|e| InventaireError::Internal(format!("corrupt password salt: {e}")))?;
            if hash_password(&salt, &password) != digest {
                return Err(InventaireError::Auth("invalid credentials".to_string()));
            }
            Ok(identity)
        })
        .await
        .map_err(|e| InventaireError::Internal(format!("authenticate task failed: {e}")))??;

        info!("user authenticated");
        Ok(identity)
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(InventaireError::Validation("a valid email is required".to_string()));
    }
    Ok(email)
}

fn hash_password(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn map_db_err(e: rusqlite::Error) -> InventaireError {
    InventaireError::Database(e.to_string())
}

#[cfg(test)]
mod tests {
    use inventaire_domain::FeedConfig;
    use tempfile::TempDir;

    use crate::database::SqliteInventoryStore;

    use super::*;

    fn service() -> (AuthService, Arc<SqliteInventoryStore>, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("auth.db");
        let db = Arc::new(
            DbManager::new(path.to_str().expect("utf8 path"), 2).expect("db manager"),
        );
        let store =
            Arc::new(SqliteInventoryStore::new(Arc::clone(&db), &FeedConfig::default()));
        let auth = AuthService::new(db, Arc::clone(&store) as Arc<dyn CategoryStore>);
        (auth, store, dir)
    }

    #[tokio::test]
    async fn register_then_authenticate_round_trips() {
        let (auth, store, _dir) = service();

        let identity = auth.register("chef@chantier.fr", "secret1").await.expect("register");
        let authenticated = auth.authenticate("chef@chantier.fr", "secret1").await.expect("login");
        assert_eq!(identity, authenticated);

        // Registration seeds the default category set
        let categories = store.read_category_set(&identity).await.expect("categories");
        assert!(categories.contains(&"Visseuses".to_string()));
    }

    #[tokio::test]
    async fn email_is_normalized() {
        let (auth, _store, _dir) = service();

        let identity = auth.register("  Chef@Chantier.FR ", "secret1").await.expect("register");
        let authenticated = auth.authenticate("chef@chantier.fr", "secret1").await.expect("login");
        assert_eq!(identity, authenticated);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (auth, _store, _dir) = service();

        auth.register("chef@chantier.fr", "secret1").await.expect("register");
        let err = auth.register("chef@chantier.fr", "other-password").await.unwrap_err();
        assert!(matches!(err, InventaireError::Auth(_)));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let (auth, _store, _dir) = service();

        auth.register("chef@chantier.fr", "secret1").await.expect("register");
        let err = auth.authenticate("chef@chantier.fr", "wrong-password").await.unwrap_err();
        assert!(matches!(err, InventaireError::Auth(_)));
    }

    #[tokio::test]
    async fn unknown_email_is_rejected() {
        let (auth, _store, _dir) = service();

        let err = auth.authenticate("nobody@chantier.fr", "secret1").await.unwrap_err();
        assert!(matches!(err, InventaireError::Auth(_)));
    }

    #[tokio::test]
    async fn invalid_inputs_fail_validation() {
        let (auth, _store, _dir) = service();

        let err = auth.register("not-an-email", "secret1").await.unwrap_err();
        assert!(matches!(err, InventaireError::Validation(_)));

        let err = auth.register("chef@chantier.fr", "short").await.unwrap_err();
        assert!(matches!(err, InventaireError::Validation(_)));
    }
}
