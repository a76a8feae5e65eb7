//! Error types for catalog construction

use thiserror::Error;

/// Errors raised when a page catalog violates its structural invariants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RbacError {
    /// Two page nodes share the same path
    #[error("Duplicate page path: {0}")]
    DuplicatePath(String),

    /// A page node has an empty path
    #[error("Page '{0}' has an empty path")]
    EmptyPath(String),

    /// A page node has an empty display name
    #[error("Page at '{0}' has an empty name")]
    EmptyPageName(String),
}

/// Result type for RBAC operations.
pub type RbacResult<T> = Result<T, RbacError>;

impl RbacError {
    /// Get error code for diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            RbacError::DuplicatePath(_) => "DUPLICATE_PATH",
            RbacError::EmptyPath(_) => "EMPTY_PATH",
            RbacError::EmptyPageName(_) => "EMPTY_PAGE_NAME",
        }
    }
}
