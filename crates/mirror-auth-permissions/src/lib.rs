//! # mirror-auth-permissions
//!
//! Capability-style permissions for mirror-auth.
//!
//! A [`PermissionCatalog`] is the immutable table of every known permission,
//! split into root and non-root entries. A [`PermissionSet`] is a transient
//! view over one user's active grant rows, checked against the catalog.

#![warn(clippy::all)]

pub mod catalog;
pub mod errors;
pub mod set;
pub mod types;

pub use catalog::PermissionCatalog;
pub use errors::{PermissionError, Result};
pub use set::{GrantRecord, PermissionSet};
pub use types::*;
