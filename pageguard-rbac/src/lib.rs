//! # PageGuard RBAC (Role-Based Page Access Control)
//!
//! This crate provides the policy model for page access control in the
//! studio web application: which pages exist, what each role may do on
//! them, and how a path resolves to an access level.
//!
//! ## Overview
//!
//! The pageguard-rbac crate handles:
//! - **Page Catalog**: The static tree of pages and subpages
//! - **Access Levels**: Edit, View, Hidden
//! - **Roles**: The closed set of roles and the identity string mapping
//! - **Role Definitions**: One access level per catalog page, per role
//! - **Resolution**: Pure lookup of a path's effective access
//!
//! ## Architecture
//!
//! ```text
//! PageCatalog ──▶ RoleDefinition (per RoleType) ──▶ resolve(def, path) ──▶ EffectiveAccess
//!
//! Examples:
//!   Engineer   + "/system" → Level(Edit)
//!   Designer   + "/admin"  → Level(Hidden)
//!   any        + "/nope"   → Unknown
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pageguard_rbac::{default_definitions, resolve, AccessLevel, PageCatalog, RoleType};
//!
//! let catalog = PageCatalog::builtin();
//! let mut defs = default_definitions(&catalog);
//!
//! let engineer = defs.iter_mut().find(|d| d.role_type == RoleType::Engineer).unwrap();
//! engineer.set_access_level("/settings", AccessLevel::Edit);
//!
//! assert!(resolve(Some(engineer), "/settings").is_editable());
//! assert!(!resolve(Some(engineer), "/admin").is_accessible());
//! ```
//!
//! ## Unknown vs Hidden
//!
//! Both deny. `Hidden` is an explicit decision recorded in a definition;
//! `Unknown` means the definition has no entry for the path (or there is no
//! definition). Keeping them apart makes catalog drift visible in tests
//! and diagnostics.
//!
//! ## Integration
//!
//! - `pageguard-store`: Persists role definitions and heals them against the catalog
//! - `pageguard-access`: Binds identities to definitions and answers access queries

pub mod access;
pub mod defaults;
pub mod definition;
pub mod error;
pub mod pages;
pub mod resolver;
pub mod roles;

// Re-export main types for convenience
pub use access::{AccessLevel, EffectiveAccess};
pub use defaults::{default_definition, default_definitions};
pub use definition::{PageAccess, RoleDefinition};
pub use error::{RbacError, RbacResult};
pub use pages::{PageCatalog, PageNode};
pub use resolver::{resolve, resolve_all};
pub use roles::RoleType;
