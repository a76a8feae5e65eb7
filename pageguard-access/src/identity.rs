//! Caller identity
//!
//! The authentication system hands over a role string. It is untrusted:
//! it is mapped once, here, onto the closed [`RoleType`] set.

use pageguard_rbac::RoleType;

/// The caller whose access is being decided.
///
/// # Examples
///
/// ```
/// use pageguard_access::Identity;
/// use pageguard_rbac::RoleType;
///
/// let admin = Identity::new("admin");
/// assert_eq!(admin.role_type(), RoleType::Administrator);
/// assert!(admin.is_superuser());
///
/// let contractor = Identity::new("contractor");
/// assert_eq!(contractor.role_type(), RoleType::Engineer);
/// assert!(!contractor.is_recognised());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Role string as issued by the authentication system
    role: String,

    /// Role the string maps to
    role_type: RoleType,

    /// Whether the string was in the mapping dictionary
    recognised: bool,
}

impl Identity {
    /// Create an identity from an authentication role string.
    ///
    /// Unrecognised strings map to the most restrictive role; this is never
    /// an error.
    pub fn new(role: impl Into<String>) -> Self {
        let role = role.into();
        let (role_type, recognised) = match RoleType::lookup_identity(&role) {
            Some(role_type) => (role_type, true),
            None => {
                tracing::debug!(
                    role = %role,
                    mapped_to = %RoleType::RESTRICTED_DEFAULT,
                    "Unrecognised role string"
                );
                (RoleType::RESTRICTED_DEFAULT, false)
            }
        };

        Self {
            role,
            role_type,
            recognised,
        }
    }

    /// Create an identity for a known role.
    pub fn for_role(role_type: RoleType) -> Self {
        let role = match role_type {
            RoleType::Administrator => "admin",
            RoleType::ProductOwner => "product_owner",
            RoleType::Designer => "designer",
            RoleType::Engineer => "engineer",
            RoleType::DevOps => "devops",
        };
        Self {
            role: role.to_string(),
            role_type,
            recognised: true,
        }
    }

    /// The raw role string.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The role the string maps to.
    pub fn role_type(&self) -> RoleType {
        self.role_type
    }

    /// Check if the role string was recognised.
    pub fn is_recognised(&self) -> bool {
        self.recognised
    }

    /// Check if this identity bypasses resolution.
    pub fn is_superuser(&self) -> bool {
        self.role_type.is_superuser()
    }
}

impl From<RoleType> for Identity {
    fn from(role_type: RoleType) -> Self {
        Self::for_role(role_type)
    }
}
