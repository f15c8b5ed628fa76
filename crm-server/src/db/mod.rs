//! Database Module
//!
//! Handles SQLite connection pools and migrations. One [`DbService`] per
//! user store; creation and caching live in [`factory`].

pub mod factory;
pub mod repository;

use std::str::FromStr;
use std::sync::Arc;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tokio::sync::Mutex;

use crate::utils::AppError;

pub use factory::StoreFactory;

/// Database service — owns a SQLite connection pool for one user's store.
///
/// `write_lock` serializes every mutating sequence (uniqueness
/// check-then-insert, purchase upsert, counter increment). The source
/// process model was a single-threaded event loop; this lock restores
/// that guarantee under a multi-threaded runtime.
#[derive(Clone, Debug)]
pub struct DbService {
    pub pool: SqlitePool,
    pub(crate) write_lock: Arc<Mutex<()>>,
}

impl DbService {
    /// Open a file-backed store with WAL mode and run migrations.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::finish_setup(pool, db_path).await
    }

    /// Open an in-memory store (test double selected by configuration).
    ///
    /// A single connection keeps the whole store on one in-memory database;
    /// more connections would each see their own empty one.
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid memory options: {e}")))?
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open memory database: {e}")))?;

        Self::finish_setup(pool, ":memory:").await
    }

    async fn finish_setup(pool: SqlitePool, db_path: &str) -> Result<Self, AppError> {
        // busy_timeout: wait out write contention instead of failing fast
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to set busy_timeout: {e}")))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;

        tracing::info!(path = %db_path, "Store opened (SQLite WAL, busy_timeout=5000ms)");
        Ok(Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        })
    }
}
