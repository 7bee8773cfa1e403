//! Cryptographic error types.

use thiserror::Error;

/// Cryptographic operation errors
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Hash parameters rejected before hashing
    #[error("Invalid hash parameters: {0}")]
    InvalidParams(String),

    /// Random number generation failed
    #[error("Random number generation failed: {0}")]
    RandomGenerationFailed(String),

    /// Argon2 hashing failed
    #[error("Argon2 hashing failed: {0}")]
    Argon2Failed(String),

    /// Encoded hash could not be parsed
    #[error("Invalid hash format")]
    InvalidHashFormat,
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;
