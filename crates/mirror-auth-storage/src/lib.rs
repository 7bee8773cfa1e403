//! # mirror-auth-storage
//!
//! Storage abstraction layer for mirror-auth using RocksDB.
//!
//! This crate provides a transactional key-value interface and a RocksDB
//! implementation with serializable transactions.

#![warn(clippy::all)]

pub mod column_families;
pub mod errors;
pub mod rocksdb_impl;
pub mod traits;

pub use column_families::*;
pub use errors::{Result, StorageError};
pub use rocksdb_impl::RocksDbStorage;
pub use traits::{Storage, Transaction, TransactionExt};
