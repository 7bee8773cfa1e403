//! User service error types.

use mirror_auth_crypto::CryptoError;
use mirror_auth_storage::StorageError;
use thiserror::Error;

/// User service errors
///
/// `Display` carries detail for logs. Callers facing the outside world
/// should report [`AuthError::kind`] and [`AuthError::public_message`]
/// instead.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed username, passphrase or theme
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Username already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unknown username or wrong passphrase
    #[error("Could not authenticate this username and passphrase")]
    Unauthenticated,

    /// Issuer may not perform this grant or revocation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Referenced user does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored passphrase hash cannot be parsed
    #[error("Stored passphrase hash is malformed")]
    Format,

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cryptographic error
    #[error("Cryptographic error: {0}")]
    Crypto(CryptoError),

    /// Other internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CryptoError> for AuthError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidHashFormat => AuthError::Format,
            other => AuthError::Crypto(other),
        }
    }
}

/// Coarse error classification for transports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Unauthenticated,
    PermissionDenied,
    NotFound,
    Format,
    Internal,
}

impl AuthError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::Validation,
            AuthError::Conflict(_) => ErrorKind::Conflict,
            AuthError::Unauthenticated => ErrorKind::Unauthenticated,
            AuthError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            AuthError::NotFound(_) => ErrorKind::NotFound,
            AuthError::Format => ErrorKind::Format,
            AuthError::Storage(_) | AuthError::Crypto(_) | AuthError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Fixed message that is safe to show to a caller
    pub fn public_message(&self) -> &'static str {
        self.kind().public_message()
    }
}

impl ErrorKind {
    /// Fixed message that is safe to show to a caller
    pub fn public_message(self) -> &'static str {
        match self {
            ErrorKind::Validation => "The request contains invalid input",
            ErrorKind::Conflict => "That username is already taken",
            ErrorKind::Unauthenticated => "Could not authenticate this username and passphrase",
            ErrorKind::PermissionDenied => "You do not have permission to do that",
            ErrorKind::NotFound => "The requested user does not exist",
            ErrorKind::Format | ErrorKind::Internal => "An internal error occurred",
        }
    }
}

/// Result type for user service operations
pub type Result<T> = std::result::Result<T, AuthError>;
