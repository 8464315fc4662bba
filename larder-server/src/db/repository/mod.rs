//! Repository Module
//!
//! Owner-scoped CRUD operations over the SurrealDB tables. Every operation
//! runs through [`BaseRepository::run`]: a fast-fail connectivity gate plus a
//! bounded per-operation timeout, so no caller ever hangs on a dead
//! connection.

pub mod item;
pub mod order;

// Re-exports
pub use item::ItemRepository;
pub use order::OrderRepository;

use std::future::IntoFuture;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::Client;
use thiserror::Error;

use crate::db::DbService;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: Vec<String>,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    /// Transient: connection down or operation timed out. Retryable.
    #[error("Datastore unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl RepoError {
    pub fn validation(message: impl Into<String>, fields: Vec<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields,
        }
    }
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        let lower = msg.to_lowercase();
        // Unique index violations surface in the error text of the index
        if lower.contains("already contains") {
            RepoError::Duplicate(msg)
        } else if lower.contains("connection") || lower.contains("websocket") || lower.contains("socket") {
            RepoError::Unavailable(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: clients may send either "abc" or "item:abc"
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 创建: RecordId::from_table_key("item", key)
//   - 获取纯ID: id.key().to_string()
//   - CRUD: db.select((TABLE, key)) / bind RecordId 直接作为查询参数

/// Strip an optional `table:` prefix from a client-supplied id
pub fn record_key<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

/// Base repository with shared connection access
#[derive(Clone)]
pub struct BaseRepository {
    service: DbService,
}

impl BaseRepository {
    pub fn new(service: DbService) -> Self {
        Self { service }
    }

    /// Fresh handle per operation — picks up watchdog reconnect swaps
    pub async fn db(&self) -> Surreal<Client> {
        self.service.db().await
    }

    /// Fail fast while the resilience manager reports the datastore down
    pub fn ensure_connected(&self) -> RepoResult<()> {
        if self.service.is_connected() {
            Ok(())
        } else {
            Err(RepoError::Unavailable(
                "datastore connection is down".to_string(),
            ))
        }
    }

    /// Run one datastore operation under the bounded per-operation timeout
    pub async fn run<T, F>(&self, operation: F) -> RepoResult<T>
    where
        F: IntoFuture<Output = Result<T, surrealdb::Error>>,
    {
        self.ensure_connected()?;
        match tokio::time::timeout(self.service.op_timeout(), operation.into_future()).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(RepoError::Unavailable(
                "datastore operation timed out".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_strips_matching_prefix_only() {
        assert_eq!(record_key("item", "item:abc"), "abc");
        assert_eq!(record_key("item", "abc"), "abc");
        assert_eq!(record_key("item", "orders:abc"), "orders:abc");
    }
}
