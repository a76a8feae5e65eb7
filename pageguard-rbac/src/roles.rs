//! Role types
//!
//! This module defines the closed set of roles page access is assigned to,
//! and the mapping from the role strings issued by the authentication
//! system onto that set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a page access policy is defined for.
///
/// The set is closed. Serialized names match the persisted role editor
/// format (`"Product Owner"`, `"DevOps"`, ...).
///
/// # Superusers
///
/// `Administrator` and `ProductOwner` bypass resolution and hold Edit on
/// every page, whatever their stored definition says.
///
/// # Examples
///
/// ```
/// use pageguard_rbac::RoleType;
///
/// assert!(RoleType::Administrator.is_superuser());
/// assert!(!RoleType::Designer.is_superuser());
/// assert_eq!(RoleType::from_identity("devops"), RoleType::DevOps);
/// assert_eq!(RoleType::from_identity("contractor"), RoleType::Engineer);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RoleType {
    /// Manages product vision, requirements, and priorities
    #[serde(rename = "Product Owner")]
    ProductOwner,

    /// Designs user interfaces and user experiences
    #[serde(rename = "Designer")]
    Designer,

    /// Implements features and maintains code quality
    #[serde(rename = "Engineer")]
    Engineer,

    /// Manages infrastructure, deployments, and operations
    #[serde(rename = "DevOps")]
    DevOps,

    /// Full system access and user management
    #[serde(rename = "Administrator")]
    Administrator,
}

impl RoleType {
    /// Role assigned to identities whose role string is not recognised.
    pub const RESTRICTED_DEFAULT: RoleType = RoleType::Engineer;

    /// Map a role string from the authentication system onto a role.
    ///
    /// Matching is case-insensitive. Unrecognised strings map to
    /// [`RoleType::RESTRICTED_DEFAULT`]; an unknown identity is never
    /// granted more than the most restrictive mapped role.
    pub fn from_identity(role: &str) -> Self {
        Self::lookup_identity(role).unwrap_or(Self::RESTRICTED_DEFAULT)
    }

    /// Map a role string, reporting `None` for unrecognised strings.
    pub fn lookup_identity(role: &str) -> Option<Self> {
        match role.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Administrator),
            "product_owner" => Some(Self::ProductOwner),
            "designer" => Some(Self::Designer),
            "engineer" => Some(Self::Engineer),
            "devops" => Some(Self::DevOps),
            _ => None,
        }
    }

    /// Parse a role from its display name.
    ///
    /// # Examples
    ///
    /// ```
    /// use pageguard_rbac::RoleType;
    ///
    /// assert_eq!(RoleType::parse("Product Owner"), Some(RoleType::ProductOwner));
    /// assert_eq!(RoleType::parse("devops"), Some(RoleType::DevOps));
    /// assert_eq!(RoleType::parse("admin"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|role| role.display_name().eq_ignore_ascii_case(s.trim()))
    }

    /// Get the display name, also the persisted form.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ProductOwner => "Product Owner",
            Self::Designer => "Designer",
            Self::Engineer => "Engineer",
            Self::DevOps => "DevOps",
            Self::Administrator => "Administrator",
        }
    }

    /// Get the built-in description of the role.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ProductOwner => "Manages product vision, requirements, and priorities",
            Self::Designer => "Designs user interfaces and user experiences",
            Self::Engineer => "Implements features and maintains code quality",
            Self::DevOps => "Manages infrastructure, deployments, and operations",
            Self::Administrator => "Full system access and user management",
        }
    }

    /// Check if this role bypasses resolution and holds Edit everywhere.
    pub fn is_superuser(&self) -> bool {
        matches!(self, Self::Administrator | Self::ProductOwner)
    }

    /// Get all roles, in role editor order.
    pub fn all() -> [Self; 5] {
        [
            Self::ProductOwner,
            Self::Designer,
            Self::Engineer,
            Self::DevOps,
            Self::Administrator,
        ]
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
