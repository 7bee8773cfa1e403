//! RocksDB column family definitions.

/// Users: uid → User
pub const CF_USERS: &str = "users";

/// Username index: username → uid
pub const CF_USERS_BY_USERNAME: &str = "users_by_username";

/// User settings: uid → UserSettings
pub const CF_USER_SETTINGS: &str = "user_settings";

/// Active permission grants: permission_id → UserPermission
pub const CF_USER_PERMISSIONS: &str = "user_permissions";

/// Active grants by user: (uid, name) → permission_id
pub const CF_USER_PERMISSIONS_BY_USER: &str = "user_permissions_by_user";

/// Active grants by name: (name, uid) → permission_id
pub const CF_USER_PERMISSIONS_BY_NAME: &str = "user_permissions_by_name";

/// Grant audit trail: (uid, event_id) → GrantAuditEvent (append-only)
pub const CF_PERMISSION_GRANTS: &str = "permission_grants";

/// Revocation audit trail: (uid, event_id) → RevocationAuditEvent (append-only)
pub const CF_PERMISSION_REVOCATIONS: &str = "permission_revocations";

/// Id sequences: column family name → last assigned id
pub const CF_SEQUENCES: &str = "sequences";

/// Get all column family names
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        CF_USERS,
        CF_USERS_BY_USERNAME,
        CF_USER_SETTINGS,
        CF_USER_PERMISSIONS,
        CF_USER_PERMISSIONS_BY_USER,
        CF_USER_PERMISSIONS_BY_NAME,
        CF_PERMISSION_GRANTS,
        CF_PERMISSION_REVOCATIONS,
        CF_SEQUENCES,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_column_families_non_empty() {
        let cfs = all_column_families();
        assert!(!cfs.is_empty());
    }

    #[test]
    fn test_no_duplicate_column_families() {
        let cfs = all_column_families();
        let mut unique = std::collections::HashSet::new();

        for cf in &cfs {
            assert!(unique.insert(cf), "Duplicate column family: {}", cf);
        }
    }
}
