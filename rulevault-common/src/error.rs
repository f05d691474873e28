//! Error types for RuleVault
//!
//! Provides a unified error type hierarchy for the whole system.

use thiserror::Error;

/// Result type alias using RuleVault's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for RuleVault
#[derive(Error, Debug)]
pub enum Error {
    // Adapter Errors
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    // Backend Errors
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    // Policy Validation Errors
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    // Configuration Errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO Errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-operation adapter failures, each wrapping the underlying
/// backend error.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Connection failed: {0}")]
    Connection(#[source] BackendError),

    #[error("Load failed: {0}")]
    LoadFailed(#[source] BackendError),

    #[error("Save failed: {0}")]
    SaveFailed(#[source] BackendError),

    #[error("Insert failed: {0}")]
    InsertFailed(#[source] BackendError),

    #[error("Delete failed: {0}")]
    DeleteFailed(#[source] BackendError),
}

/// Validation errors raised before any I/O is attempted.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Rule has {0} values, at most 4 are storable")]
    TooManyFields(usize),

    #[error("Filter range out of bounds: offset {offset} with {len} values exceeds the 4 value slots")]
    FilterOutOfRange { offset: usize, len: usize },
}

/// Raw store failures reported by a query backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt row data: {0}")]
    Corrupt(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Serialization(e.to_string())
    }
}
