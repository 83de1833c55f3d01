//! Contact store.
//!
//! [`Database`] owns the SQLite pool: it applies the embedded migrations,
//! verifies the file on open and hands out [`ContactRepository`] handles.

mod contacts;

pub use contacts::{Contact, ContactRepository};

use sqlx::SqlitePool;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Configured path that selects an ephemeral store.
pub const MEMORY_PATH: &str = ":memory:";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("integrity check failed: {0}")]
    Integrity(String),
}

/// Where contacts are kept.
enum Store<'a> {
    /// Private in-memory database. It exists only while a connection holds
    /// it open.
    Memory,
    File(&'a Path),
}

impl<'a> Store<'a> {
    fn from_path(path: &'a str) -> Self {
        if path == MEMORY_PATH {
            Self::Memory
        } else {
            Self::File(Path::new(path))
        }
    }

    /// Per-connection settings. Every pooled connection is opened with these.
    fn connect_options(&self) -> Result<SqliteConnectOptions, DbError> {
        let options = match self {
            // sqlx gives every parsed `:memory:` URL its own shared-cache name.
            Self::Memory => SqliteConnectOptions::from_str("sqlite::memory:")?
                .journal_mode(SqliteJournalMode::Memory),
            // WAL lets the listing page read while a submission is writing.
            Self::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
        };

        Ok(options.synchronous(SqliteSynchronous::Normal))
    }

    fn pool_options(&self, idle_timeout: Duration) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .acquire_timeout(Database::ACQUIRE_TIMEOUT)
            .test_before_acquire(true);

        match self {
            // Closing the only connection would drop every stored contact.
            Self::Memory => options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            Self::File(_) => options
                .max_connections(5)
                .idle_timeout(Some(idle_timeout)),
        }
    }

    fn prepare(&self) {
        if let Self::File(path) = self
            && let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!(path = %parent.display(), error = %e, "Failed to create database directory");
        }
    }
}

/// Database handle with connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connection acquire timeout - prevents connection storms from blocking indefinitely.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// How long a file-backed connection may sit idle before it is closed.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Open the store at `path` (or [`MEMORY_PATH`]), running migrations if needed.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        Self::open(path, Self::IDLE_TIMEOUT).await
    }

    async fn open(path: &str, idle_timeout: Duration) -> Result<Self, DbError> {
        let store = Store::from_path(path);
        store.prepare();

        let pool = store
            .pool_options(idle_timeout)
            .connect_with(store.connect_options()?)
            .await?;

        info!(path = %path, "Database connected");

        Self::run_migrations(&pool).await?;

        let integrity: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&pool)
            .await?;
        if integrity != "ok" {
            tracing::error!(integrity_check = %integrity, "Contact store failed its integrity check");
            return Err(DbError::Integrity(integrity));
        }

        Ok(Self { pool })
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(pool).await?;

        info!("Database migrations checked/applied");
        Ok(())
    }

    /// Get contact repository.
    pub fn contacts(&self) -> ContactRepository<'_> {
        ContactRepository::new(&self.pool)
    }
}
