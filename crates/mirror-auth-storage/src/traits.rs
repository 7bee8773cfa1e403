//! Storage trait definitions.

use crate::errors::{Result, StorageError};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// Storage interface for transactional key-value operations
///
/// This trait abstracts the underlying storage implementation (RocksDB)
/// to enable testing with mock implementations.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Begin a transaction
    ///
    /// Waits until the store can isolate the new transaction from every
    /// other open transaction. The returned value rolls back when dropped
    /// without a commit.
    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>>;
}

/// Transaction interface for atomic, isolated operations
///
/// Writes are staged and become visible to other transactions only on
/// `commit`. Reads inside the transaction observe its own staged writes.
///
/// Note: This trait works with pre-serialized bytes to maintain object safety.
/// Use the typed methods on `TransactionExt`, or serialize your keys/values
/// before calling the raw methods.
///
/// Transactions only need to be `Send` (not `Sync`) since they are used within a
/// single task context and not shared across threads.
#[async_trait]
pub trait Transaction: Send {
    /// Get a pre-serialized key
    fn get_raw(&self, cf: &str, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Get every key-value pair whose key starts with `prefix`, in key order
    fn scan_prefix_raw(&self, cf: &str, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Stage a pre-serialized key-value pair
    fn put_raw(&mut self, cf: &str, key: Vec<u8>, value: Vec<u8>) -> Result<()>;

    /// Stage the deletion of a pre-serialized key
    fn delete_raw(&mut self, cf: &str, key: Vec<u8>) -> Result<()>;

    /// Commit every staged write atomically
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction (drop without committing)
    fn rollback(self: Box<Self>);
}

/// Extension trait providing type-safe methods for Transaction
///
/// This trait provides generic methods that serialize keys and values before
/// calling the raw methods on Transaction.
pub trait TransactionExt: Transaction {
    /// Get a value by key (type-safe)
    ///
    /// # Returns
    ///
    /// `Ok(Some(value))` if key exists, `Ok(None)` if not found
    fn get<K, V>(&self, cf: &str, key: &K) -> Result<Option<V>>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        let key_bytes = serialize_key(key)?;
        match self.get_raw(cf, &key_bytes)? {
            Some(bytes) => Ok(Some(deserialize_value(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Check if a key exists (type-safe)
    fn exists<K>(&self, cf: &str, key: &K) -> Result<bool>
    where
        K: Serialize + ?Sized,
    {
        let key_bytes = serialize_key(key)?;
        Ok(self.get_raw(cf, &key_bytes)?.is_some())
    }

    /// Get all values whose serialized key starts with the serialized prefix
    ///
    /// Composite keys are tuples, so serializing the leading tuple elements
    /// gives a valid prefix.
    fn get_by_prefix<K, V>(&self, cf: &str, prefix: &K) -> Result<Vec<(Vec<u8>, V)>>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        let prefix_bytes = serialize_key(prefix)?;
        self.scan_prefix_raw(cf, &prefix_bytes)?
            .into_iter()
            .map(|(key, value)| Ok((key, deserialize_value(&value)?)))
            .collect()
    }

    /// Get every value in a column family
    fn get_all<V>(&self, cf: &str) -> Result<Vec<(Vec<u8>, V)>>
    where
        V: DeserializeOwned,
    {
        self.scan_prefix_raw(cf, &[])?
            .into_iter()
            .map(|(key, value)| Ok((key, deserialize_value(&value)?)))
            .collect()
    }

    /// Put a key-value pair (type-safe)
    fn put<K, V>(&mut self, cf: &str, key: &K, value: &V) -> Result<()>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        let key_bytes = serialize_key(key)?;
        let value_bytes = serialize_value(value)?;
        self.put_raw(cf, key_bytes, value_bytes)
    }

    /// Delete a key (type-safe)
    fn delete<K>(&mut self, cf: &str, key: &K) -> Result<()>
    where
        K: Serialize + ?Sized,
    {
        let key_bytes = serialize_key(key)?;
        self.delete_raw(cf, key_bytes)
    }
}

/// Automatically implement TransactionExt for all types that implement Transaction
impl<T: Transaction + ?Sized> TransactionExt for T {}

/// Helper function to serialize a key
pub(crate) fn serialize_key<K: Serialize + ?Sized>(key: &K) -> Result<Vec<u8>> {
    bincode::serialize(key).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Helper function to serialize a value
pub(crate) fn serialize_value<V: Serialize + ?Sized>(value: &V) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Helper function to deserialize a value
pub(crate) fn deserialize_value<V: DeserializeOwned>(bytes: &[u8]) -> Result<V> {
    bincode::deserialize(bytes).map_err(|e| StorageError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_key_prefix_matches_leading_element() {
        let full = serialize_key(&(7i64, "create-room")).unwrap();
        let prefix = serialize_key(&7i64).unwrap();
        assert!(full.starts_with(&prefix));

        let other = serialize_key(&(70i64, "create-room")).unwrap();
        assert!(!other.starts_with(&prefix));
    }

    #[test]
    fn test_string_prefix_does_not_match_longer_names() {
        // Length-prefixed strings keep "create" from matching "create-room"
        let full = serialize_key(&("create-room", 1i64)).unwrap();
        let prefix = serialize_key("create").unwrap();
        assert!(!full.starts_with(&prefix));

        let exact = serialize_key("create-room").unwrap();
        assert!(full.starts_with(&exact));
    }
}
