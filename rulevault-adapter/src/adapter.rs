//! Persistence adapter
//!
//! Orchestrates storage lifecycle and the five policy operations on top of
//! the row codec, the filter builder, and an injected query backend.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use rulevault_common::config::StoreConfig;
use rulevault_common::error::{AdapterError, BackendError, Result};
use rulevault_model::PolicyModel;

use crate::backend::QueryBackend;
use crate::{codec, filter};

/// Sections persisted on save. Rules under other sections stay in memory
/// only.
const SAVED_SECTIONS: [&str; 2] = ["p", "g"];

/// Persistence operations between a policy model and a store
#[async_trait]
pub trait PolicyAdapter: Send + Sync {
    /// Load every persisted rule into `model`, appending in store scan
    /// order. Rules already in the model are kept.
    async fn load_policy(&self, model: &mut PolicyModel) -> Result<()>;

    /// Replace the store contents with the model's `p` and `g` rules
    async fn save_policy(&self, model: &PolicyModel) -> Result<()>;

    /// Persist a single rule
    async fn add_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> Result<()>;

    /// Delete rows matching the rule exactly. Removing an absent rule
    /// succeeds with nothing deleted.
    async fn remove_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> Result<()>;

    /// Delete rows matching `values` placed at `field_index`, with the
    /// policy-type label matched exactly
    async fn remove_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        values: &[String],
    ) -> Result<()>;
}

/// Adapter over an injected query backend.
///
/// Holds no state beyond the backend reference and the store names;
/// `close` releases the reference deterministically.
pub struct StoreAdapter {
    backend: RwLock<Option<Arc<dyn QueryBackend>>>,
    config: StoreConfig,
}

impl StoreAdapter {
    pub fn new(backend: Arc<dyn QueryBackend>, config: StoreConfig) -> Self {
        Self {
            backend: RwLock::new(Some(backend)),
            config,
        }
    }

    /// Adapter with the default database and table names
    pub fn with_defaults(backend: Arc<dyn QueryBackend>) -> Self {
        Self::new(backend, StoreConfig::default())
    }

    fn backend(&self) -> Result<Arc<dyn QueryBackend>> {
        self.backend.read().clone().ok_or_else(|| {
            AdapterError::Connection(BackendError::Unavailable("adapter is closed".to_string()))
                .into()
        })
    }

    /// Ensure the backing database and table exist. Idempotent; re-run at
    /// the start of load and save to tolerate a store that was dropped or
    /// never initialized.
    pub async fn open(&self) -> Result<()> {
        let backend = self.backend()?;
        backend
            .ensure_database(&self.config.database)
            .await
            .map_err(AdapterError::Connection)?;
        backend
            .ensure_table(&self.config.database, &self.config.table)
            .await
            .map_err(AdapterError::Connection)?;
        Ok(())
    }

    /// Release the backend reference. Idempotent; later operations return
    /// connection errors.
    pub fn close(&self) {
        self.backend.write().take();
    }

    pub fn is_closed(&self) -> bool {
        self.backend.read().is_none()
    }

    fn database(&self) -> &str {
        &self.config.database
    }

    fn table(&self) -> &str {
        &self.config.table
    }
}

#[async_trait]
impl PolicyAdapter for StoreAdapter {
    async fn load_policy(&self, model: &mut PolicyModel) -> Result<()> {
        self.open().await?;
        let backend = self.backend()?;

        let rows = backend
            .scan(self.database(), self.table())
            .await
            .map_err(AdapterError::LoadFailed)?;

        let total = rows.len();
        let mut loaded = 0;
        for row in &rows {
            if let Some(rule) = codec::decode(row) {
                model.add_rule(&rule.section, &rule.ptype, rule.values);
                loaded += 1;
            }
        }

        debug!(total, loaded, "policy loaded from store");
        Ok(())
    }

    async fn save_policy(&self, model: &PolicyModel) -> Result<()> {
        self.open().await?;
        let backend = self.backend()?;

        // Full replace: clear, then bulk-insert. A failed clear is logged
        // and the insert still runs; readers may observe an empty table
        // between the two steps.
        if let Err(e) = backend.delete_all(self.database(), self.table()).await {
            warn!(error = %e, "failed to clear policy table before save, inserting anyway");
        }

        let mut rows = Vec::new();
        for sec in SAVED_SECTIONS {
            for (ptype, rules) in model.ptypes(sec) {
                for rule in rules {
                    rows.push(codec::encode(ptype, rule)?);
                }
            }
        }

        let count = rows.len();
        backend
            .insert_many(self.database(), self.table(), rows)
            .await
            .map_err(AdapterError::SaveFailed)?;

        info!(count, "policy saved to store");
        Ok(())
    }

    async fn add_policy(&self, _sec: &str, ptype: &str, rule: &[String]) -> Result<()> {
        let row = codec::encode(ptype, rule)?;
        let backend = self.backend()?;

        backend
            .insert(self.database(), self.table(), row)
            .await
            .map_err(AdapterError::InsertFailed)?;

        debug!(ptype, "policy rule added");
        Ok(())
    }

    async fn remove_policy(&self, _sec: &str, ptype: &str, rule: &[String]) -> Result<()> {
        let row = codec::encode(ptype, rule)?;
        let selector = filter::exact_match(&row);
        let backend = self.backend()?;

        let removed = backend
            .delete_matching(self.database(), self.table(), &selector)
            .await
            .map_err(AdapterError::DeleteFailed)?;

        debug!(ptype, removed, "policy rule removed");
        Ok(())
    }

    async fn remove_filtered_policy(
        &self,
        _sec: &str,
        ptype: &str,
        field_index: usize,
        values: &[String],
    ) -> Result<()> {
        let selector = filter::for_fields(ptype, field_index, values)?;
        let backend = self.backend()?;

        let removed = backend
            .delete_matching(self.database(), self.table(), &selector)
            .await
            .map_err(AdapterError::DeleteFailed)?;

        debug!(ptype, field_index, removed, "filtered policy rules removed");
        Ok(())
    }
}
