//! Error types for access checks
//!
//! Route handlers that prefer `?` over matching on a verdict can turn a
//! denial into one of these.

use thiserror::Error;

/// Access check error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The caller may not reach the page
    #[error("Forbidden: no access to {0}")]
    Forbidden(String),

    /// The caller may view but not modify the page
    #[error("Read-only access to {0}")]
    ReadOnly(String),
}

/// Result type for access checks.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::Forbidden(_) | AccessError::ReadOnly(_) => 403,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::Forbidden(_) => "FORBIDDEN",
            AccessError::ReadOnly(_) => "READ_ONLY",
        }
    }

    /// The path the check was made for.
    pub fn path(&self) -> &str {
        match self {
            AccessError::Forbidden(path) | AccessError::ReadOnly(path) => path,
        }
    }
}
