//! # PageGuard Store
//!
//! This crate persists role definitions for role-based page access control
//! and keeps them consistent with the page catalog.
//!
//! ## Overview
//!
//! The pageguard-store crate handles:
//! - **Backends**: A minimal async key-value trait with memory and file implementations
//! - **Role Definition Store**: Load, edit, save and reset the full definition set
//! - **Self-healing**: Stored definitions are reconciled against the catalog on load
//! - **Optimistic concurrency**: Saves can be rejected if another writer saved first
//!
//! ## Features
//!
//! - `file` (default): File-backed key-value store
//!
//! ## Storage Layout
//!
//! ```text
//! roleDefinitions        JSON array of RoleDefinition (role editor format)
//! roleDefinitions.meta   { "revision": 3, "savedAt": "2026-01-01T00:00:00Z" }
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pageguard_rbac::{AccessLevel, PageCatalog, RoleType};
//! use pageguard_store::{RoleDefinitionStore, StoreConfig};
//!
//! async fn example() {
//!     let config = StoreConfig::from_env();
//!     let backend = config.build_backend().unwrap();
//!     let store = RoleDefinitionStore::new(backend, Arc::new(PageCatalog::builtin()), config);
//!
//!     // Seeds defaults on first use
//!     let definitions = store.load_all().await;
//!     assert_eq!(definitions.len(), RoleType::all().len());
//!
//!     // Edit one cell of the role matrix and persist the whole set
//!     store.update_access_level(RoleType::Engineer, "/system", AccessLevel::Edit).await;
//!     store.save().await.unwrap();
//! }
//! ```
//!
//! ## Error Policy
//!
//! Failures that would weaken access control are resolved toward the more
//! restrictive outcome and only logged: corrupt stored data falls back to
//! defaults, unknown paths are ignored. Failures that would lose an
//! administrator's edits (a rejected write, a revision conflict) are
//! returned as [`StoreError`].

pub mod config;
pub mod error;
pub mod kv;
pub mod store;

// Re-export main types
pub use config::{ConfigError, ConfigResult, StorageBackend, StoreConfig, DEFAULT_STORAGE_KEY};
pub use error::{StorageError, StorageResult, StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryKeyValueStore};
pub use store::{heal_definitions, RoleDefinitionStore, StoreMetadata};

#[cfg(feature = "file")]
pub use kv::FileKeyValueStore;
