//! The permission catalog.

use crate::errors::{PermissionError, Result};
use crate::types::{Permission, PERMISSION_GRANT_ALL, PERMISSION_REVOKE_ALL};
use std::collections::{HashMap, HashSet};

/// Immutable table of every known permission
///
/// Built once at startup and shared behind an `Arc`. Entries keep their
/// declaration order; name lookups go through a hash index.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    all: Vec<Permission>,
    root: Vec<Permission>,
    non_root: Vec<Permission>,
    by_name: HashMap<String, usize>,
    root_names: HashSet<String>,
}

impl PermissionCatalog {
    /// Build a catalog from its entries and the names of the root entries
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if two entries share a name
    /// - `UnknownRootName` if a root name has no entry
    /// - `MissingRootPermission` if `grant-all` or `revoke-all` is not root
    pub fn new<I, S>(permissions: Vec<Permission>, root_names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut by_name = HashMap::with_capacity(permissions.len());
        for (index, permission) in permissions.iter().enumerate() {
            if by_name.insert(permission.name.clone(), index).is_some() {
                return Err(PermissionError::DuplicateName(permission.name.clone()));
            }
        }

        let mut root_set = HashSet::new();
        for name in root_names {
            let name = name.into();
            if !by_name.contains_key(&name) {
                return Err(PermissionError::UnknownRootName(name));
            }
            root_set.insert(name);
        }

        for required in [PERMISSION_GRANT_ALL, PERMISSION_REVOKE_ALL] {
            if !root_set.contains(required) {
                return Err(PermissionError::MissingRootPermission(required.to_string()));
            }
        }

        Ok(Self::index(permissions, by_name, root_set))
    }

    fn index(
        permissions: Vec<Permission>,
        by_name: HashMap<String, usize>,
        root_names: HashSet<String>,
    ) -> Self {
        let (root, non_root): (Vec<_>, Vec<_>) = permissions
            .iter()
            .cloned()
            .partition(|p| root_names.contains(&p.name));

        Self {
            all: permissions,
            root,
            non_root,
            by_name,
            root_names,
        }
    }

    /// The built-in catalog
    ///
    /// The table is fixed; `test_builtin_catalog_is_valid` holds it to the
    /// same checks as `new`.
    pub fn builtin() -> Self {
        let permissions = Self::builtin_permissions();
        let by_name = permissions
            .iter()
            .enumerate()
            .map(|(index, p)| (p.name.clone(), index))
            .collect();
        let root_names = permissions
            .iter()
            .filter(|p| p.category == "Root")
            .map(|p| p.name.clone())
            .collect();

        Self::index(permissions, by_name, root_names)
    }

    fn builtin_permissions() -> Vec<Permission> {
        vec![
            Permission::new(
                PERMISSION_GRANT_ALL,
                "Grant All Permissions",
                "The root permission. Only one person should have this at a time.",
                "Root",
            ),
            Permission::new(
                PERMISSION_REVOKE_ALL,
                "Revoke All Permissions",
                "The root revocation permission. Only one person should have this at a time.",
                "Root",
            ),
            Permission::new(
                "review-character-applications",
                "Review Character Applications",
                "Enable this user to review Character Applications.",
                "Reviewer",
            ),
            Permission::new(
                "view-all-rooms",
                "View All Rooms",
                "The permission to view (but not edit) all room data.",
                "Room",
            ),
            Permission::new(
                "create-room",
                "Create Room",
                "Create a new room, but not connect it to the grid.",
                "Room",
            ),
            Permission::new(
                "view-all-actor-images",
                "View All Actor Images",
                "View all Actor Images, i.e. in the main Actor Images list.",
                "Actor",
            ),
            Permission::new(
                "create-actor-image",
                "Create Actor Image",
                "Create new actor via creating new Actor Images",
                "Actor",
            ),
            Permission::new(
                "create-changelog",
                "Create Changelogs",
                "Draft and edit changelogs prior to release",
                "Changelog",
            ),
            Permission::new(
                "release-changelog",
                "Release Changelogs",
                "Release a changelog. Once released, it cannot be edited or revoked",
                "Changelog",
            ),
            Permission::new(
                "revoke-changelog",
                "Revoke Changelogs",
                "Revoke a changelog. This is an emergency measure.",
                "Changelog",
            ),
        ]
    }

    /// Look up an entry by name
    pub fn get(&self, name: &str) -> Option<&Permission> {
        self.by_name.get(name).map(|&index| &self.all[index])
    }

    /// Every entry, in declaration order
    pub fn all(&self) -> &[Permission] {
        &self.all
    }

    /// Root entries
    pub fn root(&self) -> &[Permission] {
        &self.root
    }

    /// Every entry that is not root
    pub fn non_root(&self) -> &[Permission] {
        &self.non_root
    }

    /// Whether `name` refers to a catalog entry
    pub fn is_valid_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Whether `name` refers to a root entry
    pub fn is_root_name(&self, name: &str) -> bool {
        self.root_names.contains(name)
    }
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
