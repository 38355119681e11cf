//! # Local Database Module
//!
//! Local SQLite persistence for the thread store. The reducer produces
//! [`ThreadStoreOperation`](crate::shared::operation::ThreadStoreOperation)
//! batches; this module applies the same batches to the `threads` table so
//! the persisted cache tracks the in-memory store delta by delta, and loads
//! the cache back on start-up.
//!
//! ## Key Components
//!
//! - `LocalDatabase`: connection pool and schema management
//! - `schema.rs`: table definitions and migration bookkeeping
//! - `threads.rs`: thread row conversion and operation processing
//!
//! ## Usage
//!
//! ```rust,no_run
//! use threadsync::client::local_db::LocalDatabase;
//!
//! # async fn example() -> threadsync::client::local_db::Result<()> {
//! let db = LocalDatabase::open("/tmp/threads.db").await?;
//! let thread_infos = db.get_all_threads().await?;
//! println!("{} cached threads", thread_infos.len());
//! # Ok(())
//! # }
//! ```

pub mod schema;
pub mod threads;

pub use threads::ClientDbThreadInfo;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use thiserror::Error;

use crate::shared::config::AppConfig;

/// Local database errors
#[derive(Debug, Error)]
pub enum LocalDbError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt thread row {id}: {message}")]
    CorruptRow { id: String, message: String },
}

/// Result type for local database operations
pub type Result<T> = std::result::Result<T, LocalDbError>;

/// Local database connection manager
#[derive(Debug, Clone)]
pub struct LocalDatabase {
    pool: SqlitePool,
}

impl LocalDatabase {
    /// Open or create the database file at `path`
    ///
    /// Creates missing parent directories and switches the database to WAL
    /// mode.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
        sqlx::query("PRAGMA synchronous=NORMAL").execute(&pool).await?;

        tracing::info!("Opened local thread database at {}", path.display());
        Self::with_pool(pool).await
    }

    /// Open the database configured in `config`
    pub async fn open_with_config(config: &AppConfig) -> Result<Self> {
        Self::open(config.resolved_database_path()).await
    }

    /// Open a private in-memory database
    ///
    /// The pool is pinned to a single connection that never expires, since
    /// every SQLite connection sees its own in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Create tables and run pending migrations
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(schema::CREATE_SCHEMA_MIGRATIONS_TABLE)
            .execute(&self.pool)
            .await?;
        self.run_migrations().await
    }

    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.schema_version().await?;
        if !schema::needs_migration(current_version) {
            return Ok(());
        }
        for version in schema::get_pending_migrations(current_version) {
            let mut tx = self.pool.begin().await?;
            match version {
                1 => {
                    sqlx::query(schema::CREATE_THREADS_TABLE)
                        .execute(&mut *tx)
                        .await?;
                }
                other => {
                    tracing::warn!("No migration steps defined for version {}", other);
                }
            }
            sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)")
                .bind(version)
                .bind(chrono::Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            tracing::info!("Applied local database migration {}", version);
        }
        Ok(())
    }

    /// Highest applied migration version, 0 for a fresh database
    pub async fn schema_version(&self) -> Result<i32> {
        let (version,): (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await?;
        Ok(version)
    }

    /// Get connection pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
