//! User service record types.

use crate::theme::Theme;
use mirror_auth_permissions::GrantRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// User identifier assigned by the store
pub type UserId = i64;

/// Issuer id recorded for changes made by the system itself
pub const SYSTEM_UID: UserId = 0;

/// User record
///
/// Created by registration and never modified afterwards.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub pw_hash: String,
    pub created_at: u64,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("pw_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Per-user settings, one row per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub id: i64,
    pub uid: UserId,
    pub theme: Theme,
    pub created_at: u64,
    pub updated_at: u64,
}

/// A permission a user currently holds
///
/// At most one row exists per (uid, name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermission {
    pub id: i64,
    pub uid: UserId,
    pub issuer_uid: UserId,
    pub name: String,
    pub created_at: u64,
}

impl GrantRecord for UserPermission {
    fn permission_name(&self) -> &str {
        &self.name
    }
}

/// Audit record of a grant (append-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantAuditEvent {
    pub id: i64,
    pub uid: UserId,
    pub issuer_uid: UserId,
    pub name: String,
    pub created_at: u64,
}

/// Audit record of a revocation (append-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationAuditEvent {
    pub id: i64,
    pub uid: UserId,
    pub issuer_uid: UserId,
    pub name: String,
    /// Id of the active permission row this revocation removed
    pub permission_id: i64,
    pub created_at: u64,
}

/// Full audit trail for one user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionHistory {
    pub grants: Vec<GrantAuditEvent>,
    pub revocations: Vec<RevocationAuditEvent>,
}
