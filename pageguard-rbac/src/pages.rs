//! # Page Catalog
//!
//! The static, hierarchical registry of every page and subpage in the
//! application. Role definitions are overlaid on this tree.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{RbacError, RbacResult};

/// One navigable unit: a page, or a subpage nested under a page.
///
/// A node with children is a parent; one without is a leaf. The catalog
/// does not limit nesting depth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageNode {
    /// Display label.
    pub name: String,
    /// Unique routing key.
    pub path: String,
    /// Nested subpages, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageNode>,
}

impl PageNode {
    /// Create a leaf page.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children: Vec::new(),
        }
    }

    /// Create a parent page with the given subpages.
    pub fn with_children(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Vec<PageNode>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children,
        }
    }

    /// Check if this node has no subpages.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Read-only registry of all pages.
///
/// Paths are unique across the whole tree, at every depth. This is checked
/// once, on construction.
///
/// # Example
///
/// ```
/// use pageguard_rbac::PageCatalog;
///
/// let catalog = PageCatalog::builtin();
/// assert!(catalog.contains("/admin"));
/// assert_eq!(catalog.parent_of("/designs").map(|p| p.path.as_str()), Some("/workspaces-parent"));
/// assert!(!catalog.contains("/admin/users"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCatalog {
    pages: Vec<PageNode>,
}

impl PageCatalog {
    /// Build a catalog from top-level pages.
    ///
    /// # Errors
    ///
    /// Returns an error if any node has an empty name or path, or if two
    /// nodes anywhere in the tree share a path.
    pub fn new(pages: Vec<PageNode>) -> RbacResult<Self> {
        let mut seen = HashSet::new();
        validate_nodes(&pages, &mut seen)?;
        Ok(Self { pages })
    }

    /// The application's built-in catalog.
    pub fn builtin() -> Self {
        Self {
            pages: vec![
                PageNode::new("Dashboard", "/"),
                PageNode::with_children(
                    "Workspaces",
                    "/workspaces-parent",
                    vec![
                        PageNode::new("Workspace Settings", "/workspaces"),
                        PageNode::new("Designs", "/designs"),
                        PageNode::new("Ideation", "/ideation"),
                        PageNode::new("Storyboard", "/storyboard"),
                        PageNode::new("System", "/system"),
                        PageNode::new("Capabilities", "/capabilities"),
                        PageNode::new("AI Principles", "/ai-principles"),
                        PageNode::new("UI Framework", "/ui-framework"),
                        PageNode::new("UI Styles", "/ui-styles"),
                        PageNode::new("AI Assistant", "/ai-chat"),
                    ],
                ),
                PageNode::new("Integrations", "/integrations"),
                PageNode::new("Settings", "/settings"),
                PageNode::new("Admin Panel", "/admin"),
            ],
        }
    }

    /// All top-level pages, in catalog order.
    pub fn all_pages(&self) -> &[PageNode] {
        &self.pages
    }

    /// Find a node by exact path, at any depth.
    pub fn find(&self, path: &str) -> Option<&PageNode> {
        find_node(&self.pages, path)
    }

    /// Check if a path exists in the catalog.
    pub fn contains(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    /// Find the node whose children include `path`.
    ///
    /// Returns `None` for top-level pages and for unknown paths.
    pub fn parent_of(&self, path: &str) -> Option<&PageNode> {
        find_parent(&self.pages, path)
    }

    /// All paths, depth-first in catalog order.
    pub fn paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_paths(&self.pages, &mut out);
        out
    }

    /// Total number of nodes at every depth.
    pub fn len(&self) -> usize {
        self.paths().len()
    }

    /// Check if the catalog has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Default for PageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_nodes<'a>(nodes: &'a [PageNode], seen: &mut HashSet<&'a str>) -> RbacResult<()> {
    for node in nodes {
        if node.path.trim().is_empty() {
            return Err(RbacError::EmptyPath(node.name.clone()));
        }
        if node.name.trim().is_empty() {
            return Err(RbacError::EmptyPageName(node.path.clone()));
        }
        if !seen.insert(node.path.as_str()) {
            return Err(RbacError::DuplicatePath(node.path.clone()));
        }
        validate_nodes(&node.children, seen)?;
    }
    Ok(())
}

fn find_node<'a>(nodes: &'a [PageNode], path: &str) -> Option<&'a PageNode> {
    nodes.iter().find_map(|node| {
        if node.path == path {
            Some(node)
        } else {
            find_node(&node.children, path)
        }
    })
}

fn find_parent<'a>(nodes: &'a [PageNode], path: &str) -> Option<&'a PageNode> {
    nodes.iter().find_map(|node| {
        if node.children.iter().any(|child| child.path == path) {
            Some(node)
        } else {
            find_parent(&node.children, path)
        }
    })
}

fn collect_paths<'a>(nodes: &'a [PageNode], out: &mut Vec<&'a str>) {
    for node in nodes {
        out.push(node.path.as_str());
        collect_paths(&node.children, out);
    }
}
