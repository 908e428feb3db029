//! SQLite-backed token registry.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::registry::error::RegistryError;
use crate::registry::model::{Honeytoken, NewHoneytoken};
use crate::registry::TokenRegistry;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS honeytokens (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL DEFAULT '',
    comment TEXT NOT NULL DEFAULT '',
    notify_receiver TEXT NOT NULL DEFAULT ''
)";

const SELECT_COLUMNS: &str = "SELECT id, url, title, comment, notify_receiver FROM honeytokens";

/// Token registry stored in a SQLite database.
///
/// The pool is safe to share between concurrent requests.
#[derive(Clone)]
pub struct SqliteRegistry {
    pool: SqlitePool,
}

impl SqliteRegistry {
    /// Open (or create) the database at `database_url`.
    ///
    /// Accepts a `sqlite:` URL or a bare file path.
    #[tracing::instrument(level = "info")]
    pub async fn connect(database_url: &str) -> Result<Self, RegistryError> {
        let url = normalize_url(database_url);
        tracing::debug!(database_url = %url, "Opening token registry");

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| RegistryError::InvalidInput(e.to_string()))?
            .create_if_missing(true);

        // Every connection to an in-memory database sees its own empty
        // database, so those pools are pinned to one long-lived connection.
        let pool_options = if url.contains(":memory:") || url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| RegistryError::Storage(format!("failed to open database: {e}")))?;

        tracing::info!(database_url = %url, "Token registry opened");
        Ok(Self { pool })
    }

    /// Open the database and make sure the token table exists.
    pub async fn open(database_url: &str) -> Result<Self, RegistryError> {
        let registry = Self::connect(database_url).await?;
        registry.migrate().await?;
        Ok(registry)
    }

    /// Create the token table if it is missing.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn migrate(&self) -> Result<(), RegistryError> {
        sqlx::query(SCHEMA).execute(&self.pool).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to migrate token registry");
            RegistryError::Migration(e.to_string())
        })?;
        Ok(())
    }

    /// Store a new token and return it with its assigned id.
    pub async fn insert(&self, token: NewHoneytoken) -> Result<Honeytoken, RegistryError> {
        if token.url.is_empty() {
            return Err(RegistryError::InvalidInput("url must not be empty".into()));
        }

        let result = sqlx::query(
            "INSERT INTO honeytokens (url, title, comment, notify_receiver) VALUES (?, ?, ?, ?)",
        )
        .bind(&token.url)
        .bind(&token.title)
        .bind(&token.comment)
        .bind(&token.notify_receiver)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RegistryError::AlreadyExists(token.url.clone())
            }
            other => storage_error(other),
        })?;

        Ok(Honeytoken {
            id: result.last_insert_rowid(),
            url: token.url,
            title: token.title,
            comment: token.comment,
            notify_receiver: token.notify_receiver,
        })
    }

    /// All stored tokens ordered by id.
    pub async fn list(&self) -> Result<Vec<Honeytoken>, RegistryError> {
        sqlx::query_as::<_, Honeytoken>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)
    }

    /// Fetch a token by id.
    pub async fn get(&self, id: i64) -> Result<Option<Honeytoken>, RegistryError> {
        sqlx::query_as::<_, Honeytoken>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)
    }

    /// Delete a token by id. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, RegistryError> {
        let result = sqlx::query("DELETE FROM honeytokens WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(result.rows_affected() > 0)
    }

    /// Closes the connection pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Token registry closed");
    }
}

#[async_trait]
impl TokenRegistry for SqliteRegistry {
    async fn find(&self, url: &str) -> Result<Honeytoken, RegistryError> {
        let token = sqlx::query_as::<_, Honeytoken>(&format!("{SELECT_COLUMNS} WHERE url = ?"))
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match token {
            Some(token) if token.is_stored() => {
                tracing::debug!(token_id = token.id, "Found token");
                Ok(token)
            }
            _ => Err(RegistryError::NotFound(url.to_string())),
        }
    }
}

fn storage_error(e: sqlx::Error) -> RegistryError {
    RegistryError::Storage(e.to_string())
}

fn normalize_url(database_url: &str) -> String {
    if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite://{database_url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_token(url: &str) -> NewHoneytoken {
        NewHoneytoken {
            url: url.to_string(),
            title: "Decoy".into(),
            comment: "planted in backup.zip".into(),
            notify_receiver: "ops@example.com".into(),
        }
    }

    async fn memory_registry() -> SqliteRegistry {
        SqliteRegistry::open("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn find_exact_url() {
        let registry = memory_registry().await;
        let stored = registry.insert(new_token("/admin/creds.txt")).await.unwrap();
        assert_ne!(stored.id, 0);

        let found = registry.find("/admin/creds.txt").await.unwrap();
        assert_eq!(found, stored);

        for miss in ["/admin/creds.txt/", "/Admin/Creds.txt", "/admin/creds.txt?x=1"] {
            let err = registry.find(miss).await.unwrap_err();
            assert!(err.is_not_found(), "{miss} should not match");
        }
    }

    #[tokio::test]
    async fn query_string_is_part_of_the_key() {
        let registry = memory_registry().await;
        registry.insert(new_token("/download?file=passwords.kdbx")).await.unwrap();

        assert!(registry.find("/download?file=passwords.kdbx").await.is_ok());
        assert!(registry.find("/download").await.is_err());
    }

    #[tokio::test]
    async fn duplicate_url_is_rejected() {
        let registry = memory_registry().await;
        registry.insert(new_token("/a")).await.unwrap();

        let err = registry.insert(new_token("/a")).await.unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn list_get_delete() {
        let registry = memory_registry().await;
        let a = registry.insert(new_token("/a")).await.unwrap();
        let b = registry.insert(new_token("/b")).await.unwrap();

        assert_eq!(registry.list().await.unwrap(), vec![a.clone(), b.clone()]);
        assert_eq!(registry.get(b.id).await.unwrap(), Some(b.clone()));

        assert!(registry.delete(a.id).await.unwrap());
        assert!(!registry.delete(a.id).await.unwrap());
        assert!(registry.find("/a").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn row_with_id_zero_is_not_a_match() {
        let registry = memory_registry().await;
        sqlx::query("INSERT INTO honeytokens (id, url) VALUES (0, '/zero')")
            .execute(&registry.pool)
            .await
            .unwrap();

        assert!(registry.find("/zero").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.db");

        let registry = SqliteRegistry::open(&path.display().to_string()).await.unwrap();
        registry.insert(new_token("/a")).await.unwrap();
        registry.close().await;

        assert!(path.exists());
        let reopened = SqliteRegistry::open(&path.display().to_string()).await.unwrap();
        assert_eq!(reopened.list().await.unwrap().len(), 1);
    }

    #[test]
    fn bare_paths_become_sqlite_urls() {
        assert_eq!(normalize_url("tokens.db"), "sqlite://tokens.db");
        assert_eq!(normalize_url("sqlite::memory:"), "sqlite::memory:");
    }
}
