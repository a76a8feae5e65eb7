//! # Access Resolver
//!
//! Pure resolution of a path against a role definition. No I/O, no
//! identity handling: the caller picks the definition.

use crate::access::EffectiveAccess;
use crate::definition::RoleDefinition;
use crate::pages::PageCatalog;

/// Resolve the effective access for `path`.
///
/// Searches the definition's page tree (top-level entries, then their
/// subpages) for an entry whose path matches exactly. Matching is verbatim:
/// no prefixes, no globs, no trailing-slash normalisation.
///
/// Returns [`EffectiveAccess::Unknown`] when there is no definition or no
/// matching entry.
///
/// # Example
///
/// ```
/// use pageguard_rbac::{resolve, default_definition, AccessLevel, EffectiveAccess, PageCatalog, RoleType};
///
/// let def = default_definition(&PageCatalog::builtin(), RoleType::Engineer);
/// assert_eq!(resolve(Some(&def), "/system"), EffectiveAccess::Level(AccessLevel::Edit));
/// assert_eq!(resolve(Some(&def), "/system/logs"), EffectiveAccess::Unknown);
/// assert_eq!(resolve(None, "/system"), EffectiveAccess::Unknown);
/// ```
pub fn resolve(definition: Option<&RoleDefinition>, path: &str) -> EffectiveAccess {
    definition
        .and_then(|def| def.find(path))
        .map_or(EffectiveAccess::Unknown, |entry| {
            EffectiveAccess::Level(entry.access_level)
        })
}

/// Resolve every catalog path, depth-first in catalog order.
///
/// This is the matrix a role editor renders: one row per page.
pub fn resolve_all<'a>(
    definition: Option<&RoleDefinition>,
    catalog: &'a PageCatalog,
) -> Vec<(&'a str, EffectiveAccess)> {
    catalog
        .paths()
        .into_iter()
        .map(|path| (path, resolve(definition, path)))
        .collect()
}
