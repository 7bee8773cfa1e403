//! Default Argon2id parameters for passphrase hashing.
//!
//! These values are stored inside every encoded hash, so changing them only
//! affects hashes produced afterwards. Existing hashes keep verifying with
//! the parameters they were created with.

/// Memory cost in KiB (64 MiB)
pub const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;

/// Time cost: 3 iterations
pub const DEFAULT_ITERATIONS: u32 = 3;

/// Parallelism: 2 lanes
pub const DEFAULT_PARALLELISM: u32 = 2;

/// Salt length in bytes
pub const DEFAULT_SALT_LENGTH: usize = 16;

/// Derived key length in bytes
pub const DEFAULT_KEY_LENGTH: usize = 32;

/// Smallest salt Argon2 accepts, in bytes
pub const MIN_SALT_LENGTH: usize = 8;

/// Largest salt that fits a PHC salt string, in bytes
pub const MAX_SALT_LENGTH: usize = 48;
