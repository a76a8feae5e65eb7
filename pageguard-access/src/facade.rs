//! # Authorization Facade
//!
//! The single entry point the rest of the application calls. Binds an
//! identity to its role definition and delegates to the resolver.
//!
//! Administrator and Product Owner are superusers: they hold Edit on every
//! path and no stored definition is consulted for them, so a missing or
//! malformed definition can never lock them out. Every other role is denied
//! whatever its definition does not explicitly grant.

use pageguard_rbac::{resolve, AccessLevel, EffectiveAccess, RoleDefinition, RoleType};
use pageguard_store::RoleDefinitionStore;
use std::collections::HashMap;
use std::sync::Arc;

use crate::identity::Identity;

/// Page access queries scoped to one caller.
///
/// Route guards call [`can_access`](Self::can_access), navigation calls
/// [`is_visible`](Self::is_visible), read-only banners call
/// [`is_editable`](Self::is_editable).
pub trait PageAccessPolicy {
    /// Check if the caller may reach the page.
    fn can_access(&self, path: &str) -> bool;

    /// Check if the page is listed in navigation.
    ///
    /// There is no "visible but blocked" state: this matches
    /// [`can_access`](Self::can_access).
    fn is_visible(&self, path: &str) -> bool {
        self.can_access(path)
    }

    /// Check if the caller may modify the page.
    fn is_editable(&self, path: &str) -> bool;
}

/// Authorization over a snapshot of role definitions.
///
/// Cloning is cheap; clones share the snapshot. Build a new one after the
/// store saves or reloads.
///
/// # Example
///
/// ```
/// use pageguard_access::{AccessControl, Identity};
/// use pageguard_rbac::{default_definitions, PageCatalog};
///
/// let control = AccessControl::new(default_definitions(&PageCatalog::builtin()));
///
/// let designer = Identity::new("designer");
/// assert!(control.can_access(&designer, "/designs"));
/// assert!(!control.can_access(&designer, "/admin"));
///
/// let admin = Identity::new("admin");
/// assert!(control.is_editable(&admin, "/anything-at-all"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    definitions: Arc<HashMap<RoleType, RoleDefinition>>,
}

impl AccessControl {
    /// Build from a definition set. If a role appears twice, the first
    /// definition wins.
    pub fn new(definitions: impl IntoIterator<Item = RoleDefinition>) -> Self {
        let mut by_role = HashMap::new();
        for def in definitions {
            by_role.entry(def.role_type).or_insert(def);
        }
        Self {
            definitions: Arc::new(by_role),
        }
    }

    /// Authorization with no definitions loaded.
    ///
    /// Superusers keep full access; everyone else is denied.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from the store's current working copy.
    pub async fn from_store(store: &RoleDefinitionStore) -> Self {
        Self::new(store.definitions().await)
    }

    /// The definition consulted for `role`, if any.
    pub fn definition_for(&self, role: RoleType) -> Option<&RoleDefinition> {
        self.definitions.get(&role)
    }

    /// Effective access of `identity` on `path`.
    ///
    /// Superusers get `Level(Edit)` without resolution. Others get the
    /// resolved level, or `Unknown` if their definition (or the path in it)
    /// is missing.
    pub fn access_level(&self, identity: &Identity, path: &str) -> EffectiveAccess {
        if identity.is_superuser() {
            return EffectiveAccess::Level(AccessLevel::Edit);
        }
        resolve(self.definition_for(identity.role_type()), path)
    }

    /// Check if `identity` may reach `path`.
    pub fn can_access(&self, identity: &Identity, path: &str) -> bool {
        identity.is_superuser() || self.access_level(identity, path).is_accessible()
    }

    /// Check if `path` is listed in navigation for `identity`.
    pub fn is_visible(&self, identity: &Identity, path: &str) -> bool {
        self.can_access(identity, path)
    }

    /// Check if `identity` may modify `path`.
    pub fn is_editable(&self, identity: &Identity, path: &str) -> bool {
        identity.is_superuser() || self.access_level(identity, path).is_editable()
    }

    /// Bind the facade to the current caller.
    pub fn for_identity(&self, identity: Identity) -> ScopedAccess {
        ScopedAccess {
            control: self.clone(),
            identity,
        }
    }
}

/// Access queries for the current caller.
///
/// The identity is resolved once, when the scope is created.
#[derive(Debug, Clone)]
pub struct ScopedAccess {
    control: AccessControl,
    identity: Identity,
}

impl ScopedAccess {
    /// The caller.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Effective access on `path`.
    pub fn access_level(&self, path: &str) -> EffectiveAccess {
        self.control.access_level(&self.identity, path)
    }

    /// The definition consulted for the caller.
    ///
    /// `None` for superusers with no stored definition, and for other roles
    /// before definitions are loaded.
    pub fn current_role_definition(&self) -> Option<&RoleDefinition> {
        self.control.definition_for(self.identity.role_type())
    }
}

impl PageAccessPolicy for ScopedAccess {
    fn can_access(&self, path: &str) -> bool {
        self.control.can_access(&self.identity, path)
    }

    fn is_visible(&self, path: &str) -> bool {
        self.control.is_visible(&self.identity, path)
    }

    fn is_editable(&self, path: &str) -> bool {
        self.control.is_editable(&self.identity, path)
    }
}

impl<P: PageAccessPolicy + ?Sized> PageAccessPolicy for &P {
    fn can_access(&self, path: &str) -> bool {
        (**self).can_access(path)
    }

    fn is_visible(&self, path: &str) -> bool {
        (**self).is_visible(path)
    }

    fn is_editable(&self, path: &str) -> bool {
        (**self).is_editable(path)
    }
}
