//! # mirror-auth-crypto
//!
//! Cryptographic primitives for the mirror-auth user service.
//!
//! This crate provides passphrase hashing and verification with Argon2id,
//! serialized as self-describing PHC strings.
//!
//! ## Security Properties
//!
//! - Salts come from the operating system's CSPRNG
//! - Hash comparison is constant-time
//! - No unsafe code

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constants;
pub mod errors;
pub mod hashing;
pub mod utils;

pub use constants::*;
pub use errors::{CryptoError, Result};
pub use hashing::*;
pub use utils::current_timestamp;
