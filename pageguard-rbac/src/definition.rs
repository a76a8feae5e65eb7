//! # Role Definitions
//!
//! A role definition overlays an access level on every node of the page
//! catalog. Levels are assigned per node: a parent's level is never copied
//! to its children.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::access::AccessLevel;
use crate::pages::{PageCatalog, PageNode};
use crate::roles::RoleType;

/// Access assigned to one page, mirroring a [`PageNode`].
///
/// Field names follow the persisted role editor format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageAccess {
    /// Display label of the page.
    pub page_name: String,
    /// Routing key of the page.
    pub path: String,
    /// Level granted on this page.
    pub access_level: AccessLevel,
    /// Access for the page's subpages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_pages: Vec<PageAccess>,
}

impl PageAccess {
    /// Build the access tree for `node`, assigning each node the level
    /// returned by `level_for`.
    pub fn from_node<F>(node: &PageNode, level_for: &F) -> Self
    where
        F: Fn(&PageNode, Option<&PageNode>) -> AccessLevel,
    {
        Self::from_node_with_parent(node, None, level_for)
    }

    fn from_node_with_parent<F>(node: &PageNode, parent: Option<&PageNode>, level_for: &F) -> Self
    where
        F: Fn(&PageNode, Option<&PageNode>) -> AccessLevel,
    {
        Self {
            page_name: node.name.clone(),
            path: node.path.clone(),
            access_level: level_for(node, parent),
            sub_pages: node
                .children
                .iter()
                .map(|child| Self::from_node_with_parent(child, Some(node), level_for))
                .collect(),
        }
    }
}

/// The full access tree assigned to one role.
///
/// # Example
///
/// ```
/// use pageguard_rbac::{AccessLevel, PageCatalog, RoleDefinition, RoleType};
///
/// let catalog = PageCatalog::builtin();
/// let mut def = RoleDefinition::uniform(&catalog, RoleType::Designer, AccessLevel::View);
///
/// assert!(def.set_access_level("/designs", AccessLevel::Edit));
/// assert_eq!(def.find("/designs").unwrap().access_level, AccessLevel::Edit);
/// assert_eq!(def.find("/workspaces-parent").unwrap().access_level, AccessLevel::View);
///
/// // Unknown paths are ignored
/// assert!(!def.set_access_level("/nowhere", AccessLevel::Edit));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoleDefinition {
    /// Role this definition applies to.
    pub role_type: RoleType,
    /// Human-readable summary of the role.
    #[serde(default)]
    pub description: String,
    /// Access for every top-level page, in catalog order.
    #[serde(default)]
    pub pages: Vec<PageAccess>,
}

impl RoleDefinition {
    /// Build a catalog-complete definition, assigning each node the level
    /// returned by `level_for(node, parent)`.
    pub fn from_catalog<F>(catalog: &PageCatalog, role_type: RoleType, level_for: F) -> Self
    where
        F: Fn(&PageNode, Option<&PageNode>) -> AccessLevel,
    {
        Self {
            role_type,
            description: role_type.description().to_string(),
            pages: catalog
                .all_pages()
                .iter()
                .map(|page| PageAccess::from_node(page, &level_for))
                .collect(),
        }
    }

    /// Build a catalog-complete definition with the same level everywhere.
    pub fn uniform(catalog: &PageCatalog, role_type: RoleType, level: AccessLevel) -> Self {
        Self::from_catalog(catalog, role_type, |_, _| level)
    }

    /// Find the entry for `path` at any depth.
    pub fn find(&self, path: &str) -> Option<&PageAccess> {
        find_entry(&self.pages, path)
    }

    /// Overwrite the level of the entry for `path`.
    ///
    /// Siblings, parents and children keep their levels. Returns `false`
    /// and changes nothing when the path has no entry.
    pub fn set_access_level(&mut self, path: &str, level: AccessLevel) -> bool {
        match find_entry_mut(&mut self.pages, path) {
            Some(entry) => {
                entry.access_level = level;
                true
            }
            None => false,
        }
    }

    /// Check that the tree has exactly one entry per catalog node, in
    /// catalog shape.
    pub fn is_complete(&self, catalog: &PageCatalog) -> bool {
        same_shape(&self.pages, catalog.all_pages())
    }

    /// Rebuild the tree to match `catalog`.
    ///
    /// Levels of entries whose path is still in the catalog are kept,
    /// wherever they sat in the old tree. Missing catalog nodes are
    /// backfilled as [`AccessLevel::Hidden`], entries for paths no longer in
    /// the catalog are dropped, and page names follow the catalog. An empty
    /// description is restored from the role.
    ///
    /// Returns `true` if anything changed.
    pub fn reconcile(&mut self, catalog: &PageCatalog) -> bool {
        let mut levels = HashMap::new();
        collect_levels(&self.pages, &mut levels);

        let rebuilt: Vec<PageAccess> = catalog
            .all_pages()
            .iter()
            .map(|page| {
                PageAccess::from_node(page, &|node: &PageNode, _: Option<&PageNode>| {
                    levels
                        .get(node.path.as_str())
                        .copied()
                        .unwrap_or(AccessLevel::Hidden)
                })
            })
            .collect();

        let mut changed = false;
        if rebuilt != self.pages {
            self.pages = rebuilt;
            changed = true;
        }
        if self.description.trim().is_empty() {
            self.description = self.role_type.description().to_string();
            changed = true;
        }
        changed
    }

    /// Visit every entry depth-first, in tree order.
    pub fn entries(&self) -> Vec<&PageAccess> {
        let mut out = Vec::new();
        collect_entries(&self.pages, &mut out);
        out
    }
}

fn find_entry<'a>(entries: &'a [PageAccess], path: &str) -> Option<&'a PageAccess> {
    entries.iter().find_map(|entry| {
        if entry.path == path {
            Some(entry)
        } else {
            find_entry(&entry.sub_pages, path)
        }
    })
}

fn find_entry_mut<'a>(entries: &'a mut [PageAccess], path: &str) -> Option<&'a mut PageAccess> {
    for entry in entries.iter_mut() {
        if entry.path == path {
            return Some(entry);
        }
        if let Some(found) = find_entry_mut(&mut entry.sub_pages, path) {
            return Some(found);
        }
    }
    None
}

fn same_shape(entries: &[PageAccess], nodes: &[PageNode]) -> bool {
    entries.len() == nodes.len()
        && entries
            .iter()
            .zip(nodes)
            .all(|(entry, node)| entry.path == node.path && same_shape(&entry.sub_pages, &node.children))
}

// First occurrence wins if a corrupt tree repeats a path.
fn collect_levels<'a>(entries: &'a [PageAccess], out: &mut HashMap<&'a str, AccessLevel>) {
    for entry in entries {
        out.entry(entry.path.as_str()).or_insert(entry.access_level);
        collect_levels(&entry.sub_pages, out);
    }
}

fn collect_entries<'a>(entries: &'a [PageAccess], out: &mut Vec<&'a PageAccess>) {
    for entry in entries {
        out.push(entry);
        collect_entries(&entry.sub_pages, out);
    }
}
