//! # PageGuard Access
//!
//! This crate is the authorization facade for role-based page access
//! control. It is the only part of the engine other subsystems call.
//!
//! ## Overview
//!
//! The pageguard-access crate handles:
//! - **Identity**: Mapping untrusted role strings onto roles
//! - **Authorization**: `can_access`, `is_visible`, `is_editable`
//! - **Route Guards**: Allowed / read-only / denied verdicts
//! - **Navigation**: Filtering menus down to visible entries
//!
//! ## Architecture
//!
//! ```text
//! auth role string ─▶ Identity ─▶ AccessControl ─▶ ScopedAccess (PageAccessPolicy)
//!                                     ▲                 ├─▶ RouteGuard
//!                    RoleDefinitionStore (snapshot)     └─▶ filter_navigation
//! ```
//!
//! ## Decision Rules
//!
//! | Caller | `can_access` / `is_visible` | `is_editable` |
//! |--------|-----------------------------|---------------|
//! | Administrator, Product Owner | always | always |
//! | Other roles | level is View or Edit | level is Edit |
//! | Unrecognised role string | as Engineer | as Engineer |
//!
//! Hidden and Unknown (no definition, or no entry for the path) both deny.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pageguard_access::{filter_navigation, AccessControl, Identity, NavItem, PageAccessPolicy, RouteGuard};
//! use pageguard_store::RoleDefinitionStore;
//!
//! async fn example() {
//!     let store = RoleDefinitionStore::in_memory();
//!     store.load_all().await;
//!
//!     let control = AccessControl::from_store(&store).await;
//!     let current = control.for_identity(Identity::new("engineer"));
//!
//!     let menu = filter_navigation(&NavItem::from_catalog(store.catalog()), &current);
//!     let guard = RouteGuard::new(&current);
//!     let verdict = guard.check("/system", true);
//!     println!("{} entries, {:?}, settings editable: {}", menu.len(), verdict, current.is_editable("/settings"));
//! }
//! ```
//!
//! ## Parent and Child Levels
//!
//! Levels are not forced to be consistent along the page tree. With a
//! Hidden parent and an Edit child, the child's route is reachable and
//! editable, but navigation hides the parent entry and with it the child.

pub mod error;
pub mod facade;
pub mod guard;
pub mod identity;
pub mod navigation;

// Re-export main types for convenience
pub use error::{AccessError, AccessResult};
pub use facade::{AccessControl, PageAccessPolicy, ScopedAccess};
pub use guard::{RouteGuard, RouteVerdict};
pub use identity::Identity;
pub use navigation::{filter_navigation, NavItem};
