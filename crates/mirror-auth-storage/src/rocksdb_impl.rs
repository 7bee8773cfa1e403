//! RocksDB storage implementation.

use crate::{
    column_families::all_column_families,
    errors::{Result, StorageError},
    traits::{Storage, Transaction},
};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, Direction, IteratorMode, Options, WriteBatch, DB};
use std::{collections::BTreeMap, path::Path, sync::Arc};
use tempfile::TempDir;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// RocksDB storage implementation
///
/// Transactions are serialized: `begin_transaction` waits for the previous
/// transaction to commit or roll back before handing out a new one. Every
/// transaction therefore sees a stable snapshot plus its own staged writes.
pub struct RocksDbStorage {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
    // Keeps the directory of a test database alive as long as the database
    _temp_dir: Option<TempDir>,
}

impl RocksDbStorage {
    /// Open RocksDB database at the specified path
    ///
    /// Creates all required column families if they don't exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = open_db(path.as_ref())?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
            _temp_dir: None,
        })
    }

    /// Open a RocksDB database in a fresh temporary directory
    ///
    /// This is public for use in other crates' test modules. The directory
    /// is removed when the storage is dropped.
    pub fn open_test() -> Result<Self> {
        let temp_dir = TempDir::new().map_err(StorageError::IoError)?;
        let db = open_db(temp_dir.path())?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
            _temp_dir: Some(temp_dir),
        })
    }
}

fn open_db(path: &Path) -> Result<DB> {
    let mut opts = Options::default();
    opts.create_if_missing(true);
    opts.create_missing_column_families(true);

    // Open database with all column families
    let db = DB::open_cf(&opts, path, all_column_families())
        .map_err(|e| StorageError::Database(e.to_string()))?;

    debug!("Opened RocksDB at {:?}", path);

    Ok(db)
}

fn cf_handle<'a>(db: &'a DB, cf: &str) -> Result<&'a ColumnFamily> {
    db.cf_handle(cf)
        .ok_or_else(|| StorageError::InvalidColumnFamily(cf.to_string()))
}

#[async_trait]
impl Storage for RocksDbStorage {
    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>> {
        let guard = Arc::clone(&self.write_lock).lock_owned().await;

        Ok(Box::new(RocksDbTransaction {
            db: Arc::clone(&self.db),
            writes: BTreeMap::new(),
            _guard: guard,
        }))
    }
}

/// RocksDB transaction implementation
///
/// Staged writes live in an ordered overlay keyed by (column family, key).
/// `None` marks a staged delete.
pub struct RocksDbTransaction {
    db: Arc<DB>,
    writes: BTreeMap<(String, Vec<u8>), Option<Vec<u8>>>,
    _guard: OwnedMutexGuard<()>,
}

#[async_trait]
impl Transaction for RocksDbTransaction {
    fn get_raw(&self, cf: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if let Some(staged) = self.writes.get(&(cf.to_string(), key.to_vec())) {
            return Ok(staged.clone());
        }

        let handle = cf_handle(&self.db, cf)?;
        self.db
            .get_cf(handle, key)
            .map_err(|e| StorageError::Database(e.to_string()))
    }

    fn scan_prefix_raw(&self, cf: &str, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let handle = cf_handle(&self.db, cf)?;
        let mut merged = BTreeMap::new();

        // Seek to the prefix and stop at the first key past it
        let iter = self
            .db
            .iterator_cf(handle, IteratorMode::From(prefix, Direction::Forward));

        for item in iter {
            let (key, value) = item.map_err(|e| StorageError::Database(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            merged.insert(key.to_vec(), value.to_vec());
        }

        let start = (cf.to_string(), prefix.to_vec());
        for ((staged_cf, key), staged) in self.writes.range(start..) {
            if staged_cf != cf || !key.starts_with(prefix) {
                break;
            }
            match staged {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }

    fn put_raw(&mut self, cf: &str, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        cf_handle(&self.db, cf)?;
        self.writes.insert((cf.to_string(), key), Some(value));
        Ok(())
    }

    fn delete_raw(&mut self, cf: &str, key: Vec<u8>) -> Result<()> {
        cf_handle(&self.db, cf)?;
        self.writes.insert((cf.to_string(), key), None);
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<()> {
        let writes = std::mem::take(&mut self.writes);
        let count = writes.len();

        let mut batch = WriteBatch::default();
        for ((cf, key), staged) in writes {
            let handle = cf_handle(&self.db, &cf)?;
            match staged {
                Some(value) => batch.put_cf(handle, key, value),
                None => batch.delete_cf(handle, key),
            }
        }

        self.db
            .write(batch)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        debug!(writes = count, "Transaction committed");
        Ok(())
    }

    fn rollback(self: Box<Self>) {
        // Staged writes are discarded on drop
    }
}

impl Drop for RocksDbTransaction {
    fn drop(&mut self) {
        if !self.writes.is_empty() {
            debug!(writes = self.writes.len(), "Transaction rolled back");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_families::{CF_USERS, CF_USER_PERMISSIONS_BY_USER};
    use crate::traits::TransactionExt;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        id: i64,
        name: String,
    }

    fn data(id: i64, name: &str) -> TestData {
        TestData {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_commit_is_visible() {
        let storage = RocksDbStorage::open_test().unwrap();

        let mut txn = storage.begin_transaction().await.unwrap();
        txn.put(CF_USERS, &1i64, &data(1, "alice")).unwrap();
        txn.commit().await.unwrap();

        let txn = storage.begin_transaction().await.unwrap();
        let result: Option<TestData> = txn.get(CF_USERS, &1i64).unwrap();
        assert_eq!(result, Some(data(1, "alice")));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let storage = RocksDbStorage::open_test().unwrap();

        let txn = storage.begin_transaction().await.unwrap();
        let result: Option<TestData> = txn.get(CF_USERS, &42i64).unwrap();
        assert_eq!(result, None);
        assert!(!txn.exists(CF_USERS, &42i64).unwrap());
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let storage = RocksDbStorage::open_test().unwrap();

        let mut txn = storage.begin_transaction().await.unwrap();
        txn.put(CF_USERS, &1i64, &data(1, "alice")).unwrap();
        txn.rollback();

        let mut txn = storage.begin_transaction().await.unwrap();
        txn.put(CF_USERS, &2i64, &data(2, "bob")).unwrap();
        drop(txn);

        let txn = storage.begin_transaction().await.unwrap();
        assert!(!txn.exists(CF_USERS, &1i64).unwrap());
        assert!(!txn.exists(CF_USERS, &2i64).unwrap());
    }

    #[tokio::test]
    async fn test_reads_observe_staged_writes() {
        let storage = RocksDbStorage::open_test().unwrap();

        let mut txn = storage.begin_transaction().await.unwrap();
        txn.put(CF_USERS, &1i64, &data(1, "alice")).unwrap();
        txn.commit().await.unwrap();

        let mut txn = storage.begin_transaction().await.unwrap();
        txn.put(CF_USERS, &2i64, &data(2, "bob")).unwrap();
        txn.delete(CF_USERS, &1i64).unwrap();

        assert!(txn.exists(CF_USERS, &2i64).unwrap());
        assert!(!txn.exists(CF_USERS, &1i64).unwrap());
    }

    #[tokio::test]
    async fn test_prefix_scan_merges_staged_writes() {
        let storage = RocksDbStorage::open_test().unwrap();

        let mut txn = storage.begin_transaction().await.unwrap();
        txn.put(CF_USER_PERMISSIONS_BY_USER, &(1i64, "create-room"), &10i64)
            .unwrap();
        txn.put(CF_USER_PERMISSIONS_BY_USER, &(1i64, "view-all-rooms"), &11i64)
            .unwrap();
        txn.put(CF_USER_PERMISSIONS_BY_USER, &(2i64, "create-room"), &12i64)
            .unwrap();
        txn.commit().await.unwrap();

        let mut txn = storage.begin_transaction().await.unwrap();
        txn.delete(CF_USER_PERMISSIONS_BY_USER, &(1i64, "view-all-rooms"))
            .unwrap();
        txn.put(CF_USER_PERMISSIONS_BY_USER, &(1i64, "grant-all"), &13i64)
            .unwrap();

        let results: Vec<(Vec<u8>, i64)> = txn
            .get_by_prefix(CF_USER_PERMISSIONS_BY_USER, &1i64)
            .unwrap();
        let mut ids: Vec<i64> = results.into_iter().map(|(_, id)| id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![10, 13]);

        let all: Vec<(Vec<u8>, i64)> = txn.get_all(CF_USER_PERMISSIONS_BY_USER).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_column_family() {
        let storage = RocksDbStorage::open_test().unwrap();

        let mut txn = storage.begin_transaction().await.unwrap();
        assert!(matches!(
            txn.put("no_such_family", &1i64, &()),
            Err(StorageError::InvalidColumnFamily(_))
        ));
    }

    #[tokio::test]
    async fn test_transactions_are_serialized() {
        let storage = RocksDbStorage::open_test().unwrap();

        let first = storage.begin_transaction().await.unwrap();

        let blocked =
            tokio::time::timeout(Duration::from_millis(50), storage.begin_transaction()).await;
        assert!(blocked.is_err());

        drop(first);

        let second =
            tokio::time::timeout(Duration::from_millis(500), storage.begin_transaction()).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_reopen_keeps_committed_data() {
        let dir = TempDir::new().unwrap();

        {
            let storage = RocksDbStorage::open(dir.path()).unwrap();
            let mut txn = storage.begin_transaction().await.unwrap();
            txn.put(CF_USERS, &7i64, &data(7, "carol")).unwrap();
            txn.commit().await.unwrap();
        }

        let storage = RocksDbStorage::open(dir.path()).unwrap();
        let txn = storage.begin_transaction().await.unwrap();
        let result: Option<TestData> = txn.get(CF_USERS, &7i64).unwrap();
        assert_eq!(result, Some(data(7, "carol")));
    }
}
