//! Navigation filtering
//!
//! Removes menu entries the caller may not see. A parent entry that had
//! children disappears when none of them remain visible.

use pageguard_rbac::{PageCatalog, PageNode};
use serde::{Deserialize, Serialize};

use crate::facade::PageAccessPolicy;

/// One navigation entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavItem {
    /// Label shown in the menu.
    pub label: String,
    /// Route the entry links to. Section headers have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Nested entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl NavItem {
    /// Create a linked entry.
    pub fn link(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: Some(path.into()),
            children: Vec::new(),
        }
    }

    /// Create a section header grouping `children`.
    pub fn section(label: impl Into<String>, children: Vec<NavItem>) -> Self {
        Self {
            label: label.into(),
            path: None,
            children,
        }
    }

    /// Build the menu for the whole page catalog.
    ///
    /// Every node becomes a linked entry, so a parent page's own level
    /// gates its subpages in the menu.
    pub fn from_catalog(catalog: &PageCatalog) -> Vec<NavItem> {
        catalog.all_pages().iter().map(Self::from_node).collect()
    }

    fn from_node(node: &PageNode) -> Self {
        Self {
            label: node.name.clone(),
            path: Some(node.path.clone()),
            children: node.children.iter().map(Self::from_node).collect(),
        }
    }
}

/// Filter `items` down to what `policy` lets the caller see.
///
/// - An entry whose own path is not visible is removed with its children.
/// - Invisible children are removed.
/// - An entry that had children is removed when none remain.
///
/// # Example
///
/// ```
/// use pageguard_access::{filter_navigation, AccessControl, Identity, NavItem};
/// use pageguard_rbac::{default_definitions, PageCatalog};
///
/// let catalog = PageCatalog::builtin();
/// let control = AccessControl::new(default_definitions(&catalog));
/// let menu = filter_navigation(&NavItem::from_catalog(&catalog), &control.for_identity(Identity::new("designer")));
///
/// assert!(menu.iter().all(|item| item.path.as_deref() != Some("/admin")));
/// ```
pub fn filter_navigation<P>(items: &[NavItem], policy: &P) -> Vec<NavItem>
where
    P: PageAccessPolicy + ?Sized,
{
    items
        .iter()
        .filter_map(|item| filter_item(item, policy))
        .collect()
}

fn filter_item<P>(item: &NavItem, policy: &P) -> Option<NavItem>
where
    P: PageAccessPolicy + ?Sized,
{
    if let Some(path) = &item.path {
        if !policy.is_visible(path) {
            return None;
        }
    }

    if item.children.is_empty() {
        return Some(item.clone());
    }

    let children = filter_navigation(&item.children, policy);
    if children.is_empty() {
        return None;
    }

    Some(NavItem {
        label: item.label.clone(),
        path: item.path.clone(),
        children,
    })
}
