//! Configuration management for RuleVault

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main configuration structure for RuleVault
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a TOML or JSON file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref())
            .await
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = if path.as_ref().extension().map_or(false, |ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse TOML config: {}", e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse JSON config: {}", e)))?
        };

        Ok(config)
    }
}

/// Names of the backing database and table holding policy rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database name, created on open if absent
    pub database: String,
    /// Table name, created on open if absent
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: "rulevault".to_string(),
            table: "policy".to_string(),
        }
    }
}
