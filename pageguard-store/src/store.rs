//! Role definition store
//!
//! Owns the mapping from role to definition, the working copy an
//! administrator edits, and its persistence through a [`KeyValueStore`].
//!
//! The full definition set is stored as one JSON array under the configured
//! key; a small metadata record (revision, save time) sits next to it for
//! optimistic concurrency.

use chrono::{DateTime, Utc};
use pageguard_rbac::{
    default_definition, default_definitions, AccessLevel, PageCatalog, RoleDefinition, RoleType,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::kv::{KeyValueStore, MemoryKeyValueStore};

/// Metadata persisted alongside the definition set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreMetadata {
    /// Incremented on every save and reset.
    pub revision: u64,
    /// Time of the last save or reset.
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct WorkingCopy {
    definitions: Vec<RoleDefinition>,
    revision: u64,
    dirty: bool,
}

/// Store for role definitions.
///
/// Nothing is loaded on construction: until [`load_all`](Self::load_all)
/// runs, [`definition_for`](Self::definition_for) returns `None` and every
/// non-superuser is denied.
///
/// # Example
///
/// ```rust,no_run
/// use pageguard_rbac::{AccessLevel, RoleType};
/// use pageguard_store::RoleDefinitionStore;
///
/// async fn edit_policy() {
///     let store = RoleDefinitionStore::in_memory();
///     store.load_all().await;
///
///     store.update_access_level(RoleType::Engineer, "/settings", AccessLevel::Edit).await;
///     store.save().await.unwrap();
/// }
/// ```
pub struct RoleDefinitionStore {
    backend: Arc<dyn KeyValueStore>,
    catalog: Arc<PageCatalog>,
    config: StoreConfig,
    state: RwLock<WorkingCopy>,
}

impl std::fmt::Debug for RoleDefinitionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleDefinitionStore")
            .field("storage_key", &self.config.storage_key)
            .field("pages", &self.catalog.len())
            .finish()
    }
}

impl RoleDefinitionStore {
    /// Create a store over `backend` for the given catalog.
    pub fn new(backend: Arc<dyn KeyValueStore>, catalog: Arc<PageCatalog>, config: StoreConfig) -> Self {
        Self {
            backend,
            catalog,
            config,
            state: RwLock::new(WorkingCopy::default()),
        }
    }

    /// Create a store over `backend` with the built-in catalog and default
    /// configuration.
    pub fn with_backend(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::new(backend, Arc::new(PageCatalog::builtin()), StoreConfig::default())
    }

    /// Create a store backed by a fresh in-memory map.
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryKeyValueStore::new()))
    }

    /// The page catalog definitions are reconciled against.
    pub fn catalog(&self) -> &PageCatalog {
        &self.catalog
    }

    /// Shared handle to the page catalog.
    pub fn catalog_handle(&self) -> Arc<PageCatalog> {
        self.catalog.clone()
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Load all definitions from the backend into the working copy.
    ///
    /// - Nothing stored: the built-in defaults are persisted and returned.
    /// - Stored value does not parse: treated as absent. Defaults replace it.
    /// - Stored value parses: every definition is healed against the catalog
    ///   (missing pages become Hidden, stale pages are dropped), missing
    ///   roles get their defaults, and duplicate roles are dropped. Healed
    ///   data is written back when `persist_healed` is set.
    /// - Backend read fails: defaults are used in memory and the stored
    ///   value is left untouched.
    ///
    /// Never fails. Write failures while seeding or healing are logged.
    #[instrument(skip(self), fields(key = %self.config.storage_key))]
    pub async fn load_all(&self) -> Vec<RoleDefinition> {
        let mut state = self.state.write().await;

        let raw = match self.backend.get(&self.config.storage_key).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "Failed to read role definitions, using defaults in memory");
                let defaults = default_definitions(&self.catalog);
                state.definitions = defaults.clone();
                state.dirty = false;
                return defaults;
            }
        };

        let (definitions, persist) = match raw {
            None => {
                info!("No stored role definitions, seeding defaults");
                (default_definitions(&self.catalog), true)
            }
            Some(raw) => match serde_json::from_str::<Vec<RoleDefinition>>(&raw) {
                Ok(parsed) => {
                    let (healed, changed) = heal_definitions(&self.catalog, parsed);
                    if changed {
                        info!("Healed stored role definitions against the page catalog");
                    }
                    (healed, changed && self.config.persist_healed)
                }
                Err(e) => {
                    warn!(error = %e, "Stored role definitions are corrupt, restoring defaults");
                    (default_definitions(&self.catalog), true)
                }
            },
        };

        let revision = if persist {
            match self.persist(&definitions).await {
                Ok(meta) => Some(meta.revision),
                Err(e) => {
                    warn!(error = %e, "Failed to persist role definitions during load");
                    None
                }
            }
        } else {
            None
        };
        let revision = match revision {
            Some(revision) => revision,
            None => self.stored_revision_lenient().await,
        };

        debug!(roles = definitions.len(), revision, "Loaded role definitions");
        state.definitions = definitions.clone();
        state.revision = revision;
        state.dirty = false;
        definitions
    }

    /// Set the level of one page for one role in the working copy.
    ///
    /// The page is searched at any depth of the role's tree. Parent,
    /// siblings and children keep their levels. An unknown path (or a role
    /// with no loaded definition) is a silent no-op returning `false`.
    ///
    /// Changes are not persisted until [`save`](Self::save).
    pub async fn update_access_level(&self, role: RoleType, path: &str, level: AccessLevel) -> bool {
        let mut state = self.state.write().await;

        let updated = state
            .definitions
            .iter_mut()
            .find(|def| def.role_type == role)
            .map_or(false, |def| def.set_access_level(path, level));

        if updated {
            state.dirty = true;
            debug!(role = %role, path, level = %level, "Updated access level");
        } else {
            debug!(role = %role, path, "Ignored access level update for unknown page");
        }
        updated
    }

    /// Persist the entire definition set and make it the working copy.
    ///
    /// The set is healed against the catalog first, so the working copy
    /// always covers every role and page.
    ///
    /// # Errors
    ///
    /// Backend write failures are returned as [`StoreError::Storage`]; the
    /// working copy and the stored value are left unchanged and nothing is
    /// retried.
    #[instrument(skip(self, definitions), fields(key = %self.config.storage_key, roles = definitions.len()))]
    pub async fn save_all(&self, definitions: Vec<RoleDefinition>) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let definitions = self.heal_for_save(definitions);

        let meta = self.persist(&definitions).await.map_err(|e| {
            error!(error = %e, "Failed to save role definitions");
            e
        })?;

        info!(revision = meta.revision, "Saved role definitions");
        state.definitions = definitions;
        state.revision = meta.revision;
        state.dirty = false;
        Ok(())
    }

    /// Persist the entire definition set only if the stored revision still
    /// matches `expected_revision`.
    ///
    /// Returns the new revision.
    ///
    /// # Errors
    ///
    /// [`StoreError::Conflict`] if another writer saved since the caller's
    /// load; [`StoreError::Storage`] on backend failures.
    #[instrument(skip(self, definitions), fields(key = %self.config.storage_key))]
    pub async fn save_if_unchanged(
        &self,
        definitions: Vec<RoleDefinition>,
        expected_revision: u64,
    ) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        let definitions = self.heal_for_save(definitions);
        self.save_locked(&mut state, definitions, expected_revision).await
    }

    /// Persist the current working copy.
    ///
    /// Fails with [`StoreError::Conflict`] if another writer saved since this
    /// store last loaded or saved.
    #[instrument(skip(self), fields(key = %self.config.storage_key))]
    pub async fn save(&self) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let definitions = state.definitions.clone();
        let revision = state.revision;
        self.save_locked(&mut state, definitions, revision)
            .await
            .map(|_| ())
    }

    /// Discard persisted definitions and return to the built-in defaults.
    ///
    /// The stored value is removed; the next [`load_all`](Self::load_all)
    /// seeds defaults again. Calling this twice yields the same set.
    ///
    /// # Errors
    ///
    /// Backend failures are returned; the working copy and the stored value
    /// are left unchanged.
    #[instrument(skip(self), fields(key = %self.config.storage_key))]
    pub async fn reset_to_defaults(&self) -> StoreResult<Vec<RoleDefinition>> {
        let mut state = self.state.write().await;

        let (meta, previous) = self.bump_revision().await?;
        if let Err(e) = self.backend.remove(&self.config.storage_key).await {
            error!(error = %e, "Failed to remove role definitions");
            self.restore_metadata(previous).await;
            return Err(e.into());
        }

        let defaults = default_definitions(&self.catalog);
        info!(revision = meta.revision, "Reset role definitions to defaults");
        state.definitions = defaults.clone();
        state.revision = meta.revision;
        state.dirty = false;
        Ok(defaults)
    }

    /// Snapshot of the working copy.
    pub async fn definitions(&self) -> Vec<RoleDefinition> {
        self.state.read().await.definitions.clone()
    }

    /// Snapshot of one role's definition, if loaded.
    pub async fn definition_for(&self, role: RoleType) -> Option<RoleDefinition> {
        self.state
            .read()
            .await
            .definitions
            .iter()
            .find(|def| def.role_type == role)
            .cloned()
    }

    /// Check if the working copy has edits that are not yet persisted.
    pub async fn has_unsaved_changes(&self) -> bool {
        self.state.read().await.dirty
    }

    /// Revision of the working copy, as of the last load or save.
    pub async fn revision(&self) -> u64 {
        self.state.read().await.revision
    }

    /// Read the persisted metadata record.
    pub async fn read_metadata(&self) -> StoreResult<Option<StoreMetadata>> {
        let raw = self.backend.get(&self.config.metadata_key()).await?;
        Ok(raw.and_then(|raw| match serde_json::from_str::<StoreMetadata>(&raw) {
            Ok(meta) => Some(meta),
            Err(e) => {
                warn!(error = %e, "Stored metadata is corrupt, treating as revision 0");
                None
            }
        }))
    }

    async fn stored_revision_lenient(&self) -> u64 {
        match self.read_metadata().await {
            Ok(meta) => meta.map_or(0, |meta| meta.revision),
            Err(e) => {
                warn!(error = %e, "Failed to read store metadata");
                0
            }
        }
    }

    fn heal_for_save(&self, definitions: Vec<RoleDefinition>) -> Vec<RoleDefinition> {
        let (healed, changed) = heal_definitions(&self.catalog, definitions);
        if changed {
            warn!("Healed incomplete role definitions before saving");
        }
        healed
    }

    /// Revision check and write, with the working copy lock already held.
    async fn save_locked(
        &self,
        state: &mut WorkingCopy,
        definitions: Vec<RoleDefinition>,
        expected_revision: u64,
    ) -> StoreResult<u64> {
        let actual = self.read_metadata().await?.map_or(0, |meta| meta.revision);
        if actual != expected_revision {
            warn!(expected = expected_revision, actual, "Rejected stale save of role definitions");
            return Err(StoreError::Conflict {
                expected: expected_revision,
                actual,
            });
        }

        let meta = self.persist(&definitions).await?;
        info!(revision = meta.revision, "Saved role definitions");
        state.definitions = definitions;
        state.revision = meta.revision;
        state.dirty = false;
        Ok(meta.revision)
    }

    /// Write `definitions` under the storage key.
    ///
    /// The revision is bumped before the value is written. If the value
    /// write fails the previous metadata is restored, so a failed save never
    /// leaves a new value behind an old revision.
    async fn persist(&self, definitions: &[RoleDefinition]) -> StoreResult<StoreMetadata> {
        let value = serde_json::to_string(definitions)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let (meta, previous) = self.bump_revision().await?;
        if let Err(e) = self.backend.set(&self.config.storage_key, value).await {
            self.restore_metadata(previous).await;
            return Err(e.into());
        }
        Ok(meta)
    }

    /// Write the next revision. Returns it with the raw record it replaced.
    async fn bump_revision(&self) -> StoreResult<(StoreMetadata, Option<String>)> {
        let key = self.config.metadata_key();
        let previous = self.backend.get(&key).await?;
        let current = previous
            .as_deref()
            .and_then(|raw| serde_json::from_str::<StoreMetadata>(raw).ok())
            .map_or(0, |meta| meta.revision);

        let meta = StoreMetadata {
            revision: current + 1,
            saved_at: Utc::now(),
        };
        let value =
            serde_json::to_string(&meta).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.set(&key, value).await?;
        Ok((meta, previous))
    }

    async fn restore_metadata(&self, previous: Option<String>) {
        let key = self.config.metadata_key();
        let restored = match previous {
            Some(raw) => self.backend.set(&key, raw).await,
            None => self.backend.remove(&key).await,
        };
        if let Err(e) = restored {
            // Revision is left ahead of the stored value; later saves see a conflict
            error!(error = %e, "Failed to restore store metadata");
        }
    }
}

/// Heal a parsed definition set against the catalog.
///
/// Keeps stored order, drops repeated roles (first wins), reconciles every
/// definition's page tree, and appends built-in defaults for roles that are
/// missing. Returns the healed set and whether anything changed.
pub fn heal_definitions(
    catalog: &PageCatalog,
    parsed: Vec<RoleDefinition>,
) -> (Vec<RoleDefinition>, bool) {
    let mut changed = false;
    let mut seen = HashSet::new();
    let mut healed = Vec::with_capacity(RoleType::all().len());

    for mut def in parsed {
        if !seen.insert(def.role_type) {
            warn!(role = %def.role_type, "Dropping duplicate role definition");
            changed = true;
            continue;
        }
        if def.reconcile(catalog) {
            debug!(role = %def.role_type, "Reconciled role definition with page catalog");
            changed = true;
        }
        healed.push(def);
    }

    for role in RoleType::all() {
        if !seen.contains(&role) {
            debug!(role = %role, "Backfilling missing role definition");
            healed.push(default_definition(catalog, role));
            changed = true;
        }
    }

    (healed, changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StorageError, StorageResult};
    use async_trait::async_trait;
    use pageguard_rbac::resolve;

    fn store_over(backend: &MemoryKeyValueStore) -> RoleDefinitionStore {
        RoleDefinitionStore::with_backend(Arc::new(backend.clone()))
    }

    /// Backend that reads from an inner map but rejects every write.
    struct ReadOnlyStore(MemoryKeyValueStore);

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.0.get(key).await
        }

        async fn set(&self, _key: &str, _value: String) -> StorageResult<()> {
            Err(StorageError::Backend("quota exceeded".to_string()))
        }

        async fn remove(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Backend("quota exceeded".to_string()))
        }
    }

    /// Backend whose reads always fail.
    struct UnreadableStore(MemoryKeyValueStore);

    #[async_trait]
    impl KeyValueStore for UnreadableStore {
        async fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Backend("connection refused".to_string()))
        }

        async fn set(&self, key: &str, value: String) -> StorageResult<()> {
            self.0.set(key, value).await
        }

        async fn remove(&self, key: &str) -> StorageResult<()> {
            self.0.remove(key).await
        }
    }

    /// Backend that rejects writes and removals for keys matching a filter.
    struct RejectingStore {
        inner: MemoryKeyValueStore,
        rejects: fn(&str) -> bool,
    }

    #[async_trait]
    impl KeyValueStore for RejectingStore {
        async fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> StorageResult<()> {
            if (self.rejects)(key) {
                return Err(StorageError::Backend(format!("write to {} rejected", key)));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> StorageResult<()> {
            if (self.rejects)(key) {
                return Err(StorageError::Backend(format!("remove of {} rejected", key)));
            }
            self.inner.remove(key).await
        }
    }

    /// Seed `backend` with defaults, then open a store that rejects `rejects` keys.
    async fn seeded_rejecting(
        backend: &MemoryKeyValueStore,
        rejects: fn(&str) -> bool,
    ) -> RoleDefinitionStore {
        store_over(backend).load_all().await;
        let store = RoleDefinitionStore::with_backend(Arc::new(RejectingStore {
            inner: backend.clone(),
            rejects,
        }));
        store.load_all().await;
        store
    }

    #[tokio::test]
    async fn test_nothing_loaded_before_load_all() {
        let store = RoleDefinitionStore::in_memory();
        assert!(store.definitions().await.is_empty());
        assert!(store.definition_for(RoleType::Engineer).await.is_none());
        assert!(!store.update_access_level(RoleType::Engineer, "/", AccessLevel::Edit).await);
    }

    #[tokio::test]
    async fn test_first_load_seeds_and_persists_defaults() {
        let backend = MemoryKeyValueStore::new();
        let store = store_over(&backend);

        let defs = store.load_all().await;
        assert_eq!(defs, default_definitions(store.catalog()));

        let raw = backend.get("roleDefinitions").await.unwrap().unwrap();
        let stored: Vec<RoleDefinition> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, defs);
        assert_eq!(store.revision().await, 1);
    }

    #[tokio::test]
    async fn test_corrupt_value_is_replaced_with_defaults() {
        let backend = MemoryKeyValueStore::new();
        backend
            .set("roleDefinitions", r#"[{"roleType": "Engin"#.to_string())
            .await
            .unwrap();
        let store = store_over(&backend);

        let defs = store.load_all().await;
        assert_eq!(defs, default_definitions(store.catalog()));

        let raw = backend.get("roleDefinitions").await.unwrap().unwrap();
        assert!(serde_json::from_str::<Vec<RoleDefinition>>(&raw).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_level_counts_as_corrupt() {
        let backend = MemoryKeyValueStore::new();
        backend
            .set(
                "roleDefinitions",
                r#"[{"roleType":"Engineer","description":"","pages":[{"pageName":"Dashboard","path":"/","accessLevel":"owner"}]}]"#
                    .to_string(),
            )
            .await
            .unwrap();
        let store = store_over(&backend);
        assert_eq!(store.load_all().await, default_definitions(store.catalog()));
    }

    #[tokio::test]
    async fn test_load_heals_partial_definitions() {
        let backend = MemoryKeyValueStore::new();
        let catalog = PageCatalog::builtin();
        let mut engineer = default_definition(&catalog, RoleType::Engineer);
        engineer.set_access_level("/settings", AccessLevel::Edit);
        engineer.pages.retain(|page| page.path != "/integrations");
        backend
            .set("roleDefinitions", serde_json::to_string(&vec![engineer]).unwrap())
            .await
            .unwrap();

        let store = store_over(&backend);
        let defs = store.load_all().await;

        assert_eq!(defs.len(), RoleType::all().len());
        assert!(defs.iter().all(|def| def.is_complete(&catalog)));

        let engineer = store.definition_for(RoleType::Engineer).await.unwrap();
        assert_eq!(
            resolve(Some(&engineer), "/integrations").level(),
            Some(AccessLevel::Hidden)
        );
        assert_eq!(
            resolve(Some(&engineer), "/settings").level(),
            Some(AccessLevel::Edit)
        );
        assert_eq!(
            store.definition_for(RoleType::Designer).await,
            Some(default_definition(&catalog, RoleType::Designer))
        );

        let raw = backend.get("roleDefinitions").await.unwrap().unwrap();
        let stored: Vec<RoleDefinition> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, defs);
    }

    #[tokio::test]
    async fn test_load_heal_without_persisting() {
        let backend = MemoryKeyValueStore::new();
        backend.set("roleDefinitions", "[]".to_string()).await.unwrap();
        let config = StoreConfig {
            persist_healed: false,
            ..StoreConfig::default()
        };
        let store = RoleDefinitionStore::new(
            Arc::new(backend.clone()),
            Arc::new(PageCatalog::builtin()),
            config,
        );

        assert_eq!(store.load_all().await.len(), RoleType::all().len());
        assert_eq!(
            backend.get("roleDefinitions").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_duplicate_roles_keep_first() {
        let catalog = PageCatalog::builtin();
        let first = RoleDefinition::uniform(&catalog, RoleType::Designer, AccessLevel::View);
        let second = RoleDefinition::uniform(&catalog, RoleType::Designer, AccessLevel::Edit);

        let (healed, changed) = heal_definitions(&catalog, vec![first.clone(), second]);
        assert!(changed);
        assert_eq!(healed[0], first);
        assert_eq!(
            healed.iter().filter(|d| d.role_type == RoleType::Designer).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_heal_complete_set_is_unchanged() {
        let catalog = PageCatalog::builtin();
        let defaults = default_definitions(&catalog);
        let (healed, changed) = heal_definitions(&catalog, defaults.clone());
        assert!(!changed);
        assert_eq!(healed, defaults);
    }

    #[tokio::test]
    async fn test_update_marks_dirty_and_save_clears() {
        let store = RoleDefinitionStore::in_memory();
        store.load_all().await;
        assert!(!store.has_unsaved_changes().await);

        assert!(store.update_access_level(RoleType::Engineer, "/system", AccessLevel::Hidden).await);
        assert!(store.has_unsaved_changes().await);

        store.save().await.unwrap();
        assert!(!store.has_unsaved_changes().await);
    }

    #[tokio::test]
    async fn test_update_unknown_path_is_silent_noop() {
        let store = RoleDefinitionStore::in_memory();
        let before = store.load_all().await;

        assert!(!store.update_access_level(RoleType::Engineer, "/billing", AccessLevel::Edit).await);
        assert!(!store.has_unsaved_changes().await);
        assert_eq!(store.definitions().await, before);
    }

    #[tokio::test]
    async fn test_update_touches_only_the_named_role() {
        let store = RoleDefinitionStore::in_memory();
        store.load_all().await;
        let designer = store.definition_for(RoleType::Designer).await;

        store.update_access_level(RoleType::Engineer, "/designs", AccessLevel::Hidden).await;
        assert_eq!(store.definition_for(RoleType::Designer).await, designer);
    }

    #[tokio::test]
    async fn test_save_failure_is_surfaced() {
        let store = RoleDefinitionStore::with_backend(Arc::new(ReadOnlyStore(MemoryKeyValueStore::new())));
        let defs = store.load_all().await;
        assert_eq!(defs, default_definitions(store.catalog()));

        let mut edited = defs.clone();
        edited[0].set_access_level("/", AccessLevel::View);
        let err = store.save_all(edited).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));

        // Working copy untouched by the failed save
        assert_eq!(store.definitions().await, defs);
    }

    #[tokio::test]
    async fn test_read_failure_does_not_overwrite_stored_value() {
        let inner = MemoryKeyValueStore::new();
        inner.set("roleDefinitions", "stored".to_string()).await.unwrap();
        let store = RoleDefinitionStore::with_backend(Arc::new(UnreadableStore(inner.clone())));

        let defs = store.load_all().await;
        assert_eq!(defs, default_definitions(store.catalog()));
        assert_eq!(
            inner.get("roleDefinitions").await.unwrap().as_deref(),
            Some("stored")
        );
    }

    #[tokio::test]
    async fn test_stale_save_is_rejected() {
        let backend = MemoryKeyValueStore::new();
        let alice = store_over(&backend);
        let bob = store_over(&backend);
        alice.load_all().await;
        bob.load_all().await;

        alice.update_access_level(RoleType::DevOps, "/admin", AccessLevel::Edit).await;
        alice.save().await.unwrap();

        bob.update_access_level(RoleType::DevOps, "/admin", AccessLevel::Hidden).await;
        let err = bob.save().await.unwrap_err();
        assert!(err.is_conflict());

        // Bob reloads and sees Alice's edit
        bob.load_all().await;
        let devops = bob.definition_for(RoleType::DevOps).await.unwrap();
        assert_eq!(resolve(Some(&devops), "/admin").level(), Some(AccessLevel::Edit));
    }

    #[tokio::test]
    async fn test_save_if_unchanged_returns_new_revision() {
        let store = RoleDefinitionStore::in_memory();
        let defs = store.load_all().await;
        let revision = store.revision().await;

        let next = store.save_if_unchanged(defs.clone(), revision).await.unwrap();
        assert_eq!(next, revision + 1);

        let err = store.save_if_unchanged(defs, revision).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { expected, actual } if expected == revision && actual == next));
    }

    #[tokio::test]
    async fn test_reset_removes_stored_value() {
        let backend = MemoryKeyValueStore::new();
        let store = store_over(&backend);
        store.load_all().await;
        store.update_access_level(RoleType::Designer, "/admin", AccessLevel::Edit).await;
        store.save().await.unwrap();

        let defaults = store.reset_to_defaults().await.unwrap();
        assert_eq!(defaults, default_definitions(store.catalog()));
        assert_eq!(store.definitions().await, defaults);
        assert_eq!(backend.get("roleDefinitions").await.unwrap(), None);

        let meta = store.read_metadata().await.unwrap().unwrap();
        assert_eq!(meta.revision, store.revision().await);
    }

    #[tokio::test]
    async fn test_failed_metadata_write_leaves_value_untouched() {
        let backend = MemoryKeyValueStore::new();
        let store = seeded_rejecting(&backend, |key| key.ends_with(".meta")).await;
        let before = store.definitions().await;
        let stored_before = backend.get("roleDefinitions").await.unwrap();

        let mut edited = before.clone();
        edited[0].set_access_level("/", AccessLevel::Hidden);
        assert!(store.save_all(edited.clone()).await.is_err());

        assert_eq!(store.definitions().await, before);
        assert_eq!(backend.get("roleDefinitions").await.unwrap(), stored_before);
        assert_ne!(store_over(&backend).load_all().await, edited);

        // A writer holding revision 1 still saves against unchanged storage
        let other = store_over(&backend);
        assert!(other.save_if_unchanged(before, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_value_write_restores_revision() {
        let backend = MemoryKeyValueStore::new();
        let store = seeded_rejecting(&backend, |key| key == "roleDefinitions").await;
        let revision = store.revision().await;

        store.update_access_level(RoleType::Designer, "/admin", AccessLevel::Edit).await;
        assert!(store.save().await.is_err());

        let meta = store.read_metadata().await.unwrap().unwrap();
        assert_eq!(meta.revision, revision);
        assert!(store.has_unsaved_changes().await);
    }

    #[tokio::test]
    async fn test_failed_reset_keeps_value_and_working_copy() {
        let backend = MemoryKeyValueStore::new();
        let store = seeded_rejecting(&backend, |key| key == "roleDefinitions").await;
        let revision = store.revision().await;
        store.update_access_level(RoleType::Engineer, "/settings", AccessLevel::Edit).await;
        let edited = store.definitions().await;

        assert!(store.reset_to_defaults().await.is_err());

        assert_eq!(store.definitions().await, edited);
        assert!(backend.get("roleDefinitions").await.unwrap().is_some());
        assert_eq!(store.read_metadata().await.unwrap().unwrap().revision, revision);
    }

    #[tokio::test]
    async fn test_save_all_heals_incomplete_set() {
        let store = RoleDefinitionStore::in_memory();
        store.load_all().await;
        let catalog = PageCatalog::builtin();

        let mut designer = RoleDefinition::uniform(&catalog, RoleType::Designer, AccessLevel::View);
        designer.pages.retain(|page| page.path != "/admin");
        store.save_all(vec![designer]).await.unwrap();

        let defs = store.definitions().await;
        assert_eq!(defs.len(), RoleType::all().len());
        assert!(defs.iter().all(|def| def.is_complete(&catalog)));

        let designer = store.definition_for(RoleType::Designer).await.unwrap();
        assert_eq!(resolve(Some(&designer), "/admin").level(), Some(AccessLevel::Hidden));
        assert_eq!(resolve(Some(&designer), "/").level(), Some(AccessLevel::View));
        assert_eq!(store.load_all().await, defs);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_update_is_not_lost_by_save() {
        let backend = MemoryKeyValueStore::new();
        let store = Arc::new(store_over(&backend));
        store.load_all().await;

        for round in 0..200 {
            let level = if round % 2 == 0 { AccessLevel::Hidden } else { AccessLevel::Edit };
            let saver = {
                let store = store.clone();
                tokio::spawn(async move { store.save().await })
            };
            let updater = {
                let store = store.clone();
                tokio::spawn(async move {
                    store.update_access_level(RoleType::DevOps, "/settings", level).await
                })
            };
            saver.await.unwrap().unwrap();
            assert!(updater.await.unwrap());

            if !store.has_unsaved_changes().await {
                let raw = backend.get("roleDefinitions").await.unwrap().unwrap();
                let stored: Vec<RoleDefinition> = serde_json::from_str(&raw).unwrap();
                assert_eq!(stored, store.definitions().await, "round {}", round);
            }
            store.save().await.unwrap();
        }
    }
}
