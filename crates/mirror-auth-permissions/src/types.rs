//! Permission catalog entries.

use serde::{Deserialize, Serialize};

/// Name of the root permission that allows granting every non-root permission
pub const PERMISSION_GRANT_ALL: &str = "grant-all";

/// Name of the root permission that allows revoking every non-root permission
pub const PERMISSION_REVOKE_ALL: &str = "revoke-all";

/// A catalog entry
///
/// Only the name is ever stored alongside a grant. Title, description and
/// category are display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Unique key
    pub name: String,
    /// Human-readable title
    pub title: String,
    /// Description shown to administrators
    pub about: String,
    /// Grouping used for display
    pub category: String,
}

impl Permission {
    /// Create a catalog entry
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        about: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            about: about.into(),
            category: category.into(),
        }
    }
}
