//! Built-in default policy
//!
//! The definitions every role starts from, before an administrator edits
//! them. Rules are keyed on paths; pages a rule does not mention get the
//! role's baseline level, so the policy also covers catalogs extended after
//! deployment.

use crate::access::AccessLevel;
use crate::definition::RoleDefinition;
use crate::pages::{PageCatalog, PageNode};
use crate::roles::RoleType;

/// Path of the administration page.
pub const ADMIN_PATH: &str = "/admin";

const INTEGRATIONS_PATH: &str = "/integrations";
const SETTINGS_PATH: &str = "/settings";
const SYSTEM_PATH: &str = "/system";
const CAPABILITIES_PATH: &str = "/capabilities";

/// Default definitions for every role, in role editor order.
pub fn default_definitions(catalog: &PageCatalog) -> Vec<RoleDefinition> {
    RoleType::all()
        .into_iter()
        .map(|role| default_definition(catalog, role))
        .collect()
}

/// Default definition for a single role.
///
/// # Example
///
/// ```
/// use pageguard_rbac::{default_definition, AccessLevel, PageCatalog, RoleType};
///
/// let def = default_definition(&PageCatalog::builtin(), RoleType::Designer);
/// assert_eq!(def.find("/admin").unwrap().access_level, AccessLevel::Hidden);
/// assert_eq!(def.find("/designs").unwrap().access_level, AccessLevel::Edit);
/// ```
pub fn default_definition(catalog: &PageCatalog, role: RoleType) -> RoleDefinition {
    RoleDefinition::from_catalog(catalog, role, |node, parent| default_level(role, node, parent))
}

fn default_level(role: RoleType, node: &PageNode, parent: Option<&PageNode>) -> AccessLevel {
    let path = node.path.as_str();
    let is_subpage = parent.is_some();

    match role {
        RoleType::ProductOwner | RoleType::Administrator => AccessLevel::Edit,
        RoleType::Designer => match path {
            ADMIN_PATH if !is_subpage => AccessLevel::Hidden,
            _ => AccessLevel::Edit,
        },
        RoleType::Engineer => match path {
            ADMIN_PATH if !is_subpage => AccessLevel::Hidden,
            SYSTEM_PATH | CAPABILITIES_PATH if is_subpage => AccessLevel::Edit,
            _ => AccessLevel::View,
        },
        RoleType::DevOps => match path {
            INTEGRATIONS_PATH | SETTINGS_PATH if !is_subpage => AccessLevel::Edit,
            SYSTEM_PATH if is_subpage => AccessLevel::Edit,
            _ => AccessLevel::View,
        },
    }
}
