//! Query-execution backend contract
//!
//! The adapter delegates every round trip to an injected implementation of
//! this trait. Implementations own connection management, durability, and
//! concurrency control; the adapter passes no timeouts of its own.

use async_trait::async_trait;

use rulevault_common::error::BackendError;
use rulevault_common::types::{PolicyFilter, PolicyRow};

/// Result type for raw backend operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Unified query interface over a tabular policy store.
///
/// This trait defines the contract that any storage backend must implement
/// to work with the persistence adapter.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Create the database if it does not exist. Idempotent.
    async fn ensure_database(&self, database: &str) -> BackendResult<()>;

    /// Create the table if it does not exist. Idempotent.
    async fn ensure_table(&self, database: &str, table: &str) -> BackendResult<()>;

    /// Full scan of every row in the table. Row order is whatever the
    /// store returns; no ordering guarantee is made.
    async fn scan(&self, database: &str, table: &str) -> BackendResult<Vec<PolicyRow>>;

    /// Insert a single row, assigning it a fresh identifier
    async fn insert(&self, database: &str, table: &str, row: PolicyRow) -> BackendResult<()>;

    /// Insert a batch of rows in one operation
    async fn insert_many(
        &self,
        database: &str,
        table: &str,
        rows: Vec<PolicyRow>,
    ) -> BackendResult<()>;

    /// Delete every row in the table, returning the number removed
    async fn delete_all(&self, database: &str, table: &str) -> BackendResult<u64>;

    /// Delete all rows matching `filter`, returning the number removed.
    /// Zero matches is not an error.
    async fn delete_matching(
        &self,
        database: &str,
        table: &str,
        filter: &PolicyFilter,
    ) -> BackendResult<u64>;
}
