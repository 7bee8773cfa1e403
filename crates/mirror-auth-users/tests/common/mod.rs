#![allow(dead_code)]

use mirror_auth_crypto::HashParams;
use mirror_auth_permissions::PermissionCatalog;
use mirror_auth_storage::RocksDbStorage;
use mirror_auth_users::{
    AuthorizationService, RootAccount, ServiceConfig, StorageIdentityStore, UserPermission,
};
use std::sync::{Arc, RwLock};

pub const ROOT_USERNAME: &str = "root";
pub const ROOT_PASSPHRASE: &str = "Root_passphrase_1";

pub type TestService =
    AuthorizationService<StorageIdentityStore<RocksDbStorage>, RwLock<RootAccount>>;

/// A service over a fresh temporary database
pub struct TestEnv {
    pub service: TestService,
    pub storage: Arc<RocksDbStorage>,
    pub root: Arc<RwLock<RootAccount>>,
}

/// Cheap Argon2 parameters so tests do not spend seconds hashing
pub fn fast_config() -> ServiceConfig {
    ServiceConfig {
        hash_params: HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
            ..HashParams::default()
        },
        ..ServiceConfig::default()
    }
}

pub fn setup() -> TestEnv {
    let storage = Arc::new(RocksDbStorage::open_test().unwrap());
    let root = Arc::new(RwLock::new(RootAccount::new(ROOT_USERNAME, ROOT_PASSPHRASE)));
    let service = service_on(storage.clone(), root.clone());

    TestEnv {
        service,
        storage,
        root,
    }
}

/// A second service sharing the storage and root account of an existing one
pub fn service_on(storage: Arc<RocksDbStorage>, root: Arc<RwLock<RootAccount>>) -> TestService {
    AuthorizationService::new(
        Arc::new(StorageIdentityStore::new(storage)),
        Arc::new(PermissionCatalog::builtin()),
        root,
        fast_config(),
    )
}

pub fn set_root_username(env: &TestEnv, username: &str) {
    set_root_account(env, username, ROOT_PASSPHRASE);
}

pub fn set_root_account(env: &TestEnv, username: &str, passphrase: &str) {
    *env.root.write().unwrap() = RootAccount::new(username, passphrase);
}

pub fn names(permissions: &[UserPermission]) -> Vec<&str> {
    let mut names: Vec<&str> = permissions.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    names
}
