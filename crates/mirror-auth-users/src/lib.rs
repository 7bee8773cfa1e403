//! # mirror-auth-users
//!
//! Users and their permissions.
//!
//! This crate is responsible for:
//! - Registering and authenticating users with Argon2id passphrase hashes
//! - Per-user settings (theme)
//! - Granting and revoking catalog permissions with an append-only audit trail
//! - Reconciling the root permissions with the configured root account at boot

#![warn(clippy::all)]

pub mod config;
pub mod errors;
pub mod service;
pub mod store;
pub mod theme;
pub mod traits;
pub mod types;
pub mod validation;

pub use config::{RootAccount, RootAccountSource, ServiceConfig};
pub use errors::{AuthError, ErrorKind, Result};
pub use service::AuthorizationService;
pub use store::StorageIdentityStore;
pub use theme::Theme;
pub use traits::{Authorization, IdentityStore, IdentityTransaction};
pub use types::*;
pub use validation::{PassphraseRules, UsernameRules};
