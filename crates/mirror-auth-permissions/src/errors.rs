//! Permission catalog error types.

use thiserror::Error;

/// Errors raised while building a permission catalog
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermissionError {
    /// Two catalog entries share a name
    #[error("Duplicate permission name: {0}")]
    DuplicateName(String),

    /// A root name does not refer to a catalog entry
    #[error("Unknown root permission: {0}")]
    UnknownRootName(String),

    /// One of the required root permissions is not marked as root
    #[error("Required root permission missing: {0}")]
    MissingRootPermission(String),
}

/// Result type for permission operations
pub type Result<T> = std::result::Result<T, PermissionError>;
