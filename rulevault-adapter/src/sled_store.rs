//! Sled-backed query backend
//!
//! Durable reference backend. Each database/table pair maps to one sled
//! tree; rows are stored as JSON documents keyed by their identifier.

use std::path::Path;

use async_trait::async_trait;
use uuid::Uuid;

use rulevault_common::error::BackendError;
use rulevault_common::types::{PolicyFilter, PolicyRow};

use crate::backend::{BackendResult, QueryBackend};

/// Embedded sled database holding policy tables
pub struct SledBackend {
    db: sled::Db,
}

impl SledBackend {
    /// Open (or create) the sled database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> BackendResult<Self> {
        let db = sled::open(path).map_err(|e| BackendError::Unavailable(e.to_string()))?;
        Ok(Self { db })
    }

    fn tree(&self, database: &str, table: &str) -> BackendResult<sled::Tree> {
        self.db
            .open_tree(format!("{database}/{table}"))
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }

    fn flush_tree(tree: &sled::Tree) -> BackendResult<()> {
        tree.flush()
            .map(|_| ())
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl QueryBackend for SledBackend {
    async fn ensure_database(&self, database: &str) -> BackendResult<()> {
        // A database is a tree-name prefix; the marker tree materializes it.
        self.db
            .open_tree(database)
            .map(|_| ())
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }

    async fn ensure_table(&self, database: &str, table: &str) -> BackendResult<()> {
        self.tree(database, table).map(|_| ())
    }

    async fn scan(&self, database: &str, table: &str) -> BackendResult<Vec<PolicyRow>> {
        let tree = self.tree(database, table)?;
        let mut rows = Vec::new();
        for item in tree.iter() {
            let (key, value) = item.map_err(|e| BackendError::Unavailable(e.to_string()))?;
            let mut row: PolicyRow = serde_json::from_slice(&value)
                .map_err(|e| BackendError::Corrupt(e.to_string()))?;
            row.id
                .get_or_insert_with(|| String::from_utf8_lossy(&key).to_string());
            rows.push(row);
        }
        Ok(rows)
    }

    async fn insert(&self, database: &str, table: &str, mut row: PolicyRow) -> BackendResult<()> {
        let tree = self.tree(database, table)?;
        let id = row
            .id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        tree.insert(id.as_bytes(), serde_json::to_vec(&row)?)
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        Self::flush_tree(&tree)
    }

    async fn insert_many(
        &self,
        database: &str,
        table: &str,
        rows: Vec<PolicyRow>,
    ) -> BackendResult<()> {
        let tree = self.tree(database, table)?;
        let mut batch = sled::Batch::default();
        for mut row in rows {
            let id = row
                .id
                .get_or_insert_with(|| Uuid::new_v4().to_string())
                .clone();
            batch.insert(id.as_bytes(), serde_json::to_vec(&row)?);
        }
        tree.apply_batch(batch)
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        Self::flush_tree(&tree)
    }

    async fn delete_all(&self, database: &str, table: &str) -> BackendResult<u64> {
        let tree = self.tree(database, table)?;
        let removed = tree.len() as u64;
        tree.clear()
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        Self::flush_tree(&tree)?;
        Ok(removed)
    }

    async fn delete_matching(
        &self,
        database: &str,
        table: &str,
        filter: &PolicyFilter,
    ) -> BackendResult<u64> {
        let tree = self.tree(database, table)?;
        let mut doomed = Vec::new();
        for item in tree.iter() {
            let (key, value) = item.map_err(|e| BackendError::Unavailable(e.to_string()))?;
            let row: PolicyRow = serde_json::from_slice(&value)
                .map_err(|e| BackendError::Corrupt(e.to_string()))?;
            if filter.matches(&row) {
                doomed.push(key);
            }
        }

        let removed = doomed.len() as u64;
        for key in doomed {
            tree.remove(key)
                .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        }
        Self::flush_tree(&tree)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use tempfile::TempDir;

    fn values(fields: &[&str]) -> Vec<String> {
        fields.iter().map(ToString::to_string).collect()
    }

    fn open_backend() -> (SledBackend, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let backend = SledBackend::open(dir.path().join("data")).expect("Failed to open sled");
        (backend, dir)
    }

    #[tokio::test]
    async fn insert_scan_round_trip() {
        let (backend, _dir) = open_backend();
        backend.ensure_database("rulevault").await.unwrap();
        backend.ensure_table("rulevault", "policy").await.unwrap();

        let row = codec::encode("p", &values(&["alice", "data1", "read"])).unwrap();
        backend.insert("rulevault", "policy", row).await.unwrap();

        let rows = backend.scan("rulevault", "policy").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values(), ["alice", "data1", "read", ""]);
        assert!(rows[0].id.is_some());
    }

    #[tokio::test]
    async fn rows_survive_reopen() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("data");

        {
            let backend = SledBackend::open(&path).expect("Failed to open sled");
            let row = codec::encode("g", &values(&["alice", "data2_admin"])).unwrap();
            backend.insert("rulevault", "policy", row).await.unwrap();
        }

        let backend = SledBackend::open(&path).expect("Failed to reopen sled");
        let rows = backend.scan("rulevault", "policy").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ptype, "g");
    }

    #[tokio::test]
    async fn delete_matching_removes_only_matches() {
        let (backend, _dir) = open_backend();
        for rule in [
            &["alice", "data1", "read"][..],
            &["bob", "data1", "write"][..],
            &["carol", "data2", "read"][..],
        ] {
            let row = codec::encode("p", &values(rule)).unwrap();
            backend.insert("rulevault", "policy", row).await.unwrap();
        }

        let mut filter = rulevault_common::types::PolicyFilter::new("p");
        filter.slots[1] = Some("data1".to_string());
        let removed = backend
            .delete_matching("rulevault", "policy", &filter)
            .await
            .unwrap();
        assert_eq!(removed, 2);

        let rows = backend.scan("rulevault", "policy").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].v1, "carol");
    }

    #[tokio::test]
    async fn delete_all_reports_count() {
        let (backend, _dir) = open_backend();
        for rule in [&["alice", "data1", "read"][..], &["bob", "data2", "write"][..]] {
            let row = codec::encode("p", &values(rule)).unwrap();
            backend.insert("rulevault", "policy", row).await.unwrap();
        }

        assert_eq!(backend.delete_all("rulevault", "policy").await.unwrap(), 2);
        assert_eq!(backend.delete_all("rulevault", "policy").await.unwrap(), 0);
    }
}
