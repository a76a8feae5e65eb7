//! # Access Levels
//!
//! Defines the access levels a role can hold on a page, and the effective
//! access produced by resolving a path against a role definition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access level granted to a role on a single page or subpage.
///
/// Levels are totally ordered by privilege:
/// - **Edit**: View the page and make modifications
/// - **View**: Read-only access to the page
/// - **Hidden**: No access at all (not merely invisible in navigation)
///
/// The derived ordering follows privilege, so `Hidden < View < Edit`.
///
/// # Example
///
/// ```
/// use pageguard_rbac::AccessLevel;
///
/// assert!(AccessLevel::Edit > AccessLevel::View);
/// assert!(AccessLevel::View > AccessLevel::Hidden);
/// assert!(AccessLevel::View.allows_view());
/// assert!(!AccessLevel::View.allows_edit());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// No access. The page is neither reachable nor listed.
    Hidden = 0,

    /// Read-only access.
    View = 1,

    /// Full access including modifications.
    Edit = 2,
}

impl AccessLevel {
    /// Get the string representation of the access level.
    ///
    /// This is also the persisted form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Hidden => "hidden",
            AccessLevel::View => "view",
            AccessLevel::Edit => "edit",
        }
    }

    /// Parse access level from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(AccessLevel)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use pageguard_rbac::AccessLevel;
    ///
    /// assert_eq!(AccessLevel::parse("edit"), Some(AccessLevel::Edit));
    /// assert_eq!(AccessLevel::parse("VIEW"), Some(AccessLevel::View));
    /// assert_eq!(AccessLevel::parse("owner"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "edit" => Some(AccessLevel::Edit),
            "view" => Some(AccessLevel::View),
            "hidden" => Some(AccessLevel::Hidden),
            _ => None,
        }
    }

    /// Get a human-readable label, as shown in the role editor.
    pub fn display_name(&self) -> &'static str {
        match self {
            AccessLevel::Hidden => "Hidden",
            AccessLevel::View => "View",
            AccessLevel::Edit => "Edit",
        }
    }

    /// Get all access levels, most privileged first.
    pub fn all() -> [Self; 3] {
        [AccessLevel::Edit, AccessLevel::View, AccessLevel::Hidden]
    }

    /// Check if this level lets the holder reach and see the page.
    pub fn allows_view(&self) -> bool {
        *self >= AccessLevel::View
    }

    /// Check if this level lets the holder modify the page.
    pub fn allows_edit(&self) -> bool {
        *self == AccessLevel::Edit
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective access for a path after resolution.
///
/// `Unknown` means the role definition has no entry for the path (or no
/// definition exists at all). It is distinct from an explicit
/// [`AccessLevel::Hidden`] for diagnostics, but grants nothing: both deny.
///
/// # Example
///
/// ```
/// use pageguard_rbac::{AccessLevel, EffectiveAccess};
///
/// let hidden = EffectiveAccess::Level(AccessLevel::Hidden);
/// assert!(!hidden.is_accessible());
/// assert!(!EffectiveAccess::Unknown.is_accessible());
/// assert_ne!(hidden, EffectiveAccess::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectiveAccess {
    /// The definition holds an explicit level for the path.
    Level(AccessLevel),

    /// The definition has no opinion on the path.
    Unknown,
}

impl EffectiveAccess {
    /// The explicit level, if any.
    pub fn level(&self) -> Option<AccessLevel> {
        match self {
            EffectiveAccess::Level(level) => Some(*level),
            EffectiveAccess::Unknown => None,
        }
    }

    /// `true` for View and Edit. Hidden and Unknown both deny.
    pub fn is_accessible(&self) -> bool {
        self.level().map_or(false, |level| level.allows_view())
    }

    /// `true` only for Edit.
    pub fn is_editable(&self) -> bool {
        self.level().map_or(false, |level| level.allows_edit())
    }

    /// `true` when the definition had no entry for the path.
    pub fn is_unknown(&self) -> bool {
        matches!(self, EffectiveAccess::Unknown)
    }
}

impl From<AccessLevel> for EffectiveAccess {
    fn from(level: AccessLevel) -> Self {
        EffectiveAccess::Level(level)
    }
}

impl fmt::Display for EffectiveAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectiveAccess::Level(level) => level.fmt(f),
            EffectiveAccess::Unknown => f.write_str("unknown"),
        }
    }
}
