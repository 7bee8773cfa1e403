//! Per-user permission evaluation.

use crate::catalog::PermissionCatalog;
use crate::types::{PERMISSION_GRANT_ALL, PERMISSION_REVOKE_ALL};
use std::collections::HashSet;

/// Anything that records an active grant of a named permission
pub trait GrantRecord {
    /// Name of the granted permission
    fn permission_name(&self) -> &str;
}

impl GrantRecord for String {
    fn permission_name(&self) -> &str {
        self
    }
}

impl GrantRecord for &str {
    fn permission_name(&self) -> &str {
        self
    }
}

/// Read-only view over one user's active grants
///
/// Build it from rows read inside the same transaction that acts on the
/// decision, then drop it. Rows naming permissions that are not in the
/// catalog are ignored.
#[derive(Debug, Clone)]
pub struct PermissionSet<'a> {
    catalog: &'a PermissionCatalog,
    uid: i64,
    inner: HashSet<String>,
    list: Vec<String>,
}

impl<'a> PermissionSet<'a> {
    /// Build a set for `uid` from its active grant rows
    pub fn new<R: GrantRecord>(catalog: &'a PermissionCatalog, uid: i64, rows: &[R]) -> Self {
        let mut inner = HashSet::new();
        let mut list = Vec::new();

        for row in rows {
            let name = row.permission_name();
            if !catalog.is_valid_name(name) {
                continue;
            }
            if inner.insert(name.to_string()) {
                list.push(name.to_string());
            }
        }

        Self {
            catalog,
            uid,
            inner,
            list,
        }
    }

    /// The user this set belongs to
    pub fn uid(&self) -> i64 {
        self.uid
    }

    /// Held permission names, in row order
    pub fn names(&self) -> &[String] {
        &self.list
    }

    /// Whether the user holds `name`
    pub fn has(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    /// Whether the user holds at least one of `names`
    pub fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.has(name))
    }

    /// Whether the user holds every one of `names`
    pub fn has_all(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.has(name))
    }

    /// Whether the user may grant `name` to someone
    ///
    /// Root permissions can never be granted this way.
    pub fn can_grant(&self, name: &str) -> bool {
        self.is_assignable(name) && self.has(PERMISSION_GRANT_ALL)
    }

    /// Whether the user may revoke `name` from someone
    ///
    /// Root permissions can never be revoked this way.
    pub fn can_revoke(&self, name: &str) -> bool {
        self.is_assignable(name) && self.has(PERMISSION_REVOKE_ALL)
    }

    fn is_assignable(&self, name: &str) -> bool {
        self.catalog.is_valid_name(name) && !self.catalog.is_root_name(name)
    }
}
