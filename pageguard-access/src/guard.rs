//! Route guard
//!
//! Decides how a route renders for the current caller: normally, with a
//! read-only banner, or as an access-denied page.

use crate::error::{AccessError, AccessResult};
use crate::facade::PageAccessPolicy;

/// Outcome of a route check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteVerdict {
    /// Render the page normally.
    Allowed,

    /// Render the page under a read-only banner. Only produced when edit
    /// access was required and the caller can merely view.
    ReadOnly,

    /// Render the access-denied page instead of the content.
    Denied,
}

impl RouteVerdict {
    /// Check if the page content is rendered at all.
    pub fn renders_content(&self) -> bool {
        !matches!(self, RouteVerdict::Denied)
    }

    /// Heading shown in place of, or above, the page.
    pub fn title(&self) -> Option<&'static str> {
        match self {
            RouteVerdict::Allowed => None,
            RouteVerdict::ReadOnly => Some("Read-Only Access"),
            RouteVerdict::Denied => Some("Access Denied"),
        }
    }

    /// User-facing explanation.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            RouteVerdict::Allowed => None,
            RouteVerdict::ReadOnly => {
                Some("You have read-only access to this page. You cannot make modifications.")
            }
            RouteVerdict::Denied => Some(
                "You do not have permission to access this page. \
                 Please contact your administrator if you believe this is an error.",
            ),
        }
    }

    /// Convert to a result for `?`-style handlers.
    pub fn into_result(self, path: &str) -> AccessResult<()> {
        match self {
            RouteVerdict::Allowed => Ok(()),
            RouteVerdict::ReadOnly => Err(AccessError::ReadOnly(path.to_string())),
            RouteVerdict::Denied => Err(AccessError::Forbidden(path.to_string())),
        }
    }
}

/// Route guard over an injected access policy.
///
/// # Example
///
/// ```
/// use pageguard_access::{AccessControl, Identity, RouteGuard, RouteVerdict};
/// use pageguard_rbac::{default_definitions, PageCatalog};
///
/// let control = AccessControl::new(default_definitions(&PageCatalog::builtin()));
/// let guard = RouteGuard::new(control.for_identity(Identity::new("engineer")));
///
/// assert_eq!(guard.check("/system", true), RouteVerdict::Allowed);
/// assert_eq!(guard.check("/settings", true), RouteVerdict::ReadOnly);
/// assert_eq!(guard.check("/settings", false), RouteVerdict::Allowed);
/// assert_eq!(guard.check("/admin", false), RouteVerdict::Denied);
/// ```
#[derive(Debug, Clone)]
pub struct RouteGuard<P> {
    policy: P,
}

impl<P: PageAccessPolicy> RouteGuard<P> {
    /// Create a guard over `policy`.
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// The injected policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Check a route.
    ///
    /// Access is checked first; edit access only matters when
    /// `require_edit` is set.
    pub fn check(&self, path: &str, require_edit: bool) -> RouteVerdict {
        if !self.policy.can_access(path) {
            return RouteVerdict::Denied;
        }
        if require_edit && !self.policy.is_editable(path) {
            return RouteVerdict::ReadOnly;
        }
        RouteVerdict::Allowed
    }

    /// Check a route that needs edit access, as a result.
    pub fn require_edit(&self, path: &str) -> AccessResult<()> {
        self.check(path, true).into_result(path)
    }

    /// Check a route that needs only access, as a result.
    pub fn require_access(&self, path: &str) -> AccessResult<()> {
        self.check(path, false).into_result(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Fixed policy: path → (accessible, editable).
    struct Fixed(HashMap<&'static str, (bool, bool)>);

    impl PageAccessPolicy for Fixed {
        fn can_access(&self, path: &str) -> bool {
            self.0.get(path).map_or(false, |(access, _)| *access)
        }

        fn is_editable(&self, path: &str) -> bool {
            self.0.get(path).map_or(false, |(_, edit)| *edit)
        }
    }

    fn guard() -> RouteGuard<Fixed> {
        RouteGuard::new(Fixed(HashMap::from([
            ("/edit", (true, true)),
            ("/view", (true, false)),
            ("/hidden", (false, false)),
            // Editable but not accessible: access wins
            ("/odd", (false, true)),
        ])))
    }

    #[test]
    fn test_verdicts() {
        let guard = guard();
        assert_eq!(guard.check("/edit", true), RouteVerdict::Allowed);
        assert_eq!(guard.check("/view", true), RouteVerdict::ReadOnly);
        assert_eq!(guard.check("/view", false), RouteVerdict::Allowed);
        assert_eq!(guard.check("/hidden", false), RouteVerdict::Denied);
        assert_eq!(guard.check("/odd", true), RouteVerdict::Denied);
        assert_eq!(guard.check("/missing", false), RouteVerdict::Denied);
    }

    #[test]
    fn test_verdict_rendering() {
        assert!(RouteVerdict::Allowed.renders_content());
        assert!(RouteVerdict::ReadOnly.renders_content());
        assert!(!RouteVerdict::Denied.renders_content());
        assert_eq!(RouteVerdict::Allowed.message(), None);
        assert_eq!(RouteVerdict::Denied.title(), Some("Access Denied"));
        assert!(RouteVerdict::ReadOnly.message().unwrap().contains("read-only"));
    }

    #[test]
    fn test_result_helpers() {
        let guard = guard();
        assert!(guard.require_edit("/edit").is_ok());
        assert!(guard.require_access("/view").is_ok());

        let err = guard.require_edit("/view").unwrap_err();
        assert_eq!(err, AccessError::ReadOnly("/view".to_string()));
        assert_eq!(err.error_code(), "READ_ONLY");

        let err = guard.require_access("/hidden").unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.path(), "/hidden");
    }
}
