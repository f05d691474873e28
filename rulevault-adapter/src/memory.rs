//! In-memory query backend
//!
//! Keeps tables as plain row vectors behind locks. Serves as the embedded
//! default backend and as the test double for the adapter.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use uuid::Uuid;

use rulevault_common::error::BackendError;
use rulevault_common::types::{PolicyFilter, PolicyRow};

use crate::backend::{BackendResult, QueryBackend};

type Table = RwLock<Vec<PolicyRow>>;

#[derive(Default)]
struct Database {
    tables: DashMap<String, Arc<Table>>,
}

/// Process-local backend holding every row in memory
#[derive(Default)]
pub struct MemoryBackend {
    databases: DashMap<String, Arc<Database>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, database: &str, table: &str) -> BackendResult<Arc<Table>> {
        let db = self
            .databases
            .get(database)
            .ok_or_else(|| BackendError::Unavailable(format!("no such database: {database}")))?;
        let found = db
            .tables
            .get(table)
            .ok_or_else(|| {
                BackendError::Unavailable(format!("no such table: {database}/{table}"))
            })?
            .clone();
        Ok(found)
    }
}

#[async_trait]
impl QueryBackend for MemoryBackend {
    async fn ensure_database(&self, database: &str) -> BackendResult<()> {
        self.databases.entry(database.to_string()).or_default();
        Ok(())
    }

    async fn ensure_table(&self, database: &str, table: &str) -> BackendResult<()> {
        let db = self
            .databases
            .get(database)
            .ok_or_else(|| BackendError::Unavailable(format!("no such database: {database}")))?;
        db.tables.entry(table.to_string()).or_default();
        Ok(())
    }

    async fn scan(&self, database: &str, table: &str) -> BackendResult<Vec<PolicyRow>> {
        let table = self.table(database, table)?;
        let rows = table.read().clone();
        Ok(rows)
    }

    async fn insert(&self, database: &str, table: &str, mut row: PolicyRow) -> BackendResult<()> {
        let table = self.table(database, table)?;
        row.id.get_or_insert_with(|| Uuid::new_v4().to_string());
        table.write().push(row);
        Ok(())
    }

    async fn insert_many(
        &self,
        database: &str,
        table: &str,
        rows: Vec<PolicyRow>,
    ) -> BackendResult<()> {
        let table = self.table(database, table)?;
        let mut guard = table.write();
        for mut row in rows {
            row.id.get_or_insert_with(|| Uuid::new_v4().to_string());
            guard.push(row);
        }
        Ok(())
    }

    async fn delete_all(&self, database: &str, table: &str) -> BackendResult<u64> {
        let table = self.table(database, table)?;
        let mut guard = table.write();
        let removed = guard.len() as u64;
        guard.clear();
        Ok(removed)
    }

    async fn delete_matching(
        &self,
        database: &str,
        table: &str,
        filter: &PolicyFilter,
    ) -> BackendResult<u64> {
        let table = self.table(database, table)?;
        let mut guard = table.write();
        let before = guard.len();
        guard.retain(|row| !filter.matches(row));
        Ok((before - guard.len()) as u64)
    }
}
