//! Repository Module
//!
//! CRUD over the four entity kinds of one user's store. Sequential ids
//! come from the `counters` table and are handed out inside the same
//! transaction as the insert, so they are monotonic per store and per
//! kind and never reused after deletion.

pub mod client;
pub mod contact;
pub mod event;
pub mod purchase;

use sqlx::SqliteConnection;
use thiserror::Error;

use shared::error::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Allocate the next sequential id for an entity kind.
///
/// Runs on the caller's transaction; the increment commits or rolls back
/// with the insert it feeds.
pub(crate) async fn next_id(conn: &mut SqliteConnection, kind: &str) -> RepoResult<i64> {
    sqlx::query(
        "INSERT INTO counters (kind, next_id) VALUES (?1, 1) \
         ON CONFLICT(kind) DO UPDATE SET next_id = next_id + 1",
    )
    .bind(kind)
    .execute(&mut *conn)
    .await?;

    let id: i64 = sqlx::query_scalar("SELECT next_id FROM counters WHERE kind = ?1")
        .bind(kind)
        .fetch_one(&mut *conn)
        .await?;
    Ok(id)
}
