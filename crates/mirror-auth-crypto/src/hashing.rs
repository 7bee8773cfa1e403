//! Passphrase hashing using Argon2id.
//!
//! Hashes are PHC strings of the form
//! `$argon2id$v=19$m=65536,t=3,p=2$<salt>$<hash>`, so verification needs
//! nothing but the encoded string.

use crate::{constants::*, errors::*};
use argon2::password_hash::{Error as PasswordHashError, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::{rngs::OsRng, RngCore};

/// Argon2id cost parameters used when producing a new hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
    /// Random salt length in bytes
    pub salt_length: usize,
    /// Derived key length in bytes
    pub key_length: usize,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_MEMORY_KIB,
            iterations: DEFAULT_ITERATIONS,
            parallelism: DEFAULT_PARALLELISM,
            salt_length: DEFAULT_SALT_LENGTH,
            key_length: DEFAULT_KEY_LENGTH,
        }
    }
}

impl HashParams {
    /// Check that Argon2 would accept these parameters
    pub fn validate(&self) -> Result<()> {
        self.hasher().map(|_| ())
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        if !(MIN_SALT_LENGTH..=MAX_SALT_LENGTH).contains(&self.salt_length) {
            return Err(CryptoError::InvalidParams(format!(
                "salt length must be between {} and {} bytes, got {}",
                MIN_SALT_LENGTH, MAX_SALT_LENGTH, self.salt_length
            )));
        }

        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(self.key_length),
        )
        .map_err(|e| CryptoError::InvalidParams(e.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash a passphrase using Argon2id with a fresh random salt
///
/// # Returns
///
/// PHC-formatted hash string that includes algorithm, version, parameters,
/// salt, and hash
///
/// # Errors
///
/// `RandomGenerationFailed` if the operating system cannot supply random
/// bytes for the salt.
pub fn hash_passphrase(passphrase: &[u8], params: &HashParams) -> Result<String> {
    let argon2 = params.hasher()?;

    let salt_bytes = random_bytes(params.salt_length)?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| CryptoError::Argon2Failed(e.to_string()))?;

    let password_hash = argon2
        .hash_password(passphrase, &salt)
        .map_err(|e| CryptoError::Argon2Failed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a passphrase against an encoded Argon2id hash
///
/// The hash is recomputed with the parameters and salt embedded in
/// `encoded` and compared in constant time.
///
/// # Returns
///
/// `Ok(true)` on a match, `Ok(false)` on a mismatch
///
/// # Errors
///
/// `InvalidHashFormat` if `encoded` is not a usable Argon2id PHC string.
pub fn verify_passphrase(passphrase: &[u8], encoded: &str) -> Result<bool> {
    let parsed = PasswordHash::new(encoded).map_err(|_| CryptoError::InvalidHashFormat)?;

    if parsed.algorithm != Algorithm::Argon2id.ident() {
        return Err(CryptoError::InvalidHashFormat);
    }

    match Argon2::default().verify_password(passphrase, &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(_) => Err(CryptoError::InvalidHashFormat),
    }
}

fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::RandomGenerationFailed(e.to_string()))?;
    Ok(bytes)
}
