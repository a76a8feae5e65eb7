//! Store configuration.
//!
//! Selects the persistence backend and the key role definitions live
//! under. Configuration is loaded from environment variables with defaults
//! suitable for local development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::kv::{KeyValueStore, MemoryKeyValueStore};

/// Key the original role editor used in browser local storage.
pub const DEFAULT_STORAGE_KEY: &str = "roleDefinitions";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Persistence backend for role definitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local map. Definitions are lost on restart.
    Memory,
    /// One JSON file per key under `data_dir`.
    File,
}

impl StorageBackend {
    /// Parse backend from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Some(Self::Memory),
            "file" | "fs" => Some(Self::File),
            _ => None,
        }
    }

    /// Get string representation of the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
        }
    }
}

/// Role definition store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key the full definition set is stored under.
    pub storage_key: String,

    /// Backend holding the definitions.
    pub backend: StorageBackend,

    /// Directory for the file backend.
    pub data_dir: PathBuf,

    /// Write definitions back after healing them against the page catalog.
    pub persist_healed: bool,
}

impl Default for StoreConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data"),
            persist_healed: true,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PAGEGUARD_STORAGE_KEY`: Key for the definition set (default: roleDefinitions)
    /// - `PAGEGUARD_STORE_BACKEND`: `memory` or `file` (default: memory)
    /// - `PAGEGUARD_DATA_DIR`: Directory for the file backend (default: ./data)
    /// - `PAGEGUARD_PERSIST_HEALED`: Re-persist healed definitions (default: true)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            storage_key: std::env::var("PAGEGUARD_STORAGE_KEY").unwrap_or(default.storage_key),
            backend: std::env::var("PAGEGUARD_STORE_BACKEND")
                .ok()
                .and_then(|s| StorageBackend::parse(&s))
                .unwrap_or(default.backend),
            data_dir: std::env::var("PAGEGUARD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.data_dir),
            persist_healed: std::env::var("PAGEGUARD_PERSIST_HEALED")
                .map(|s| s != "false" && s != "0")
                .unwrap_or(default.persist_healed),
        }
    }

    /// Key the store metadata (revision, save time) lives under.
    pub fn metadata_key(&self) -> String {
        format!("{}.meta", self.storage_key)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "storage_key".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.backend == StorageBackend::File && self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "data_dir".to_string(),
                message: "required for the file backend".to_string(),
            });
        }
        Ok(())
    }

    /// Construct the configured backend.
    pub fn build_backend(&self) -> ConfigResult<Arc<dyn KeyValueStore>> {
        self.validate()?;
        match self.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryKeyValueStore::new())),
            #[cfg(feature = "file")]
            StorageBackend::File => Ok(Arc::new(crate::kv::FileKeyValueStore::new(
                self.data_dir.clone(),
            ))),
            #[cfg(not(feature = "file"))]
            StorageBackend::File => Err(ConfigError::InvalidValue {
                key: "backend".to_string(),
                message: "file backend requires the `file` feature".to_string(),
            }),
        }
    }
}
