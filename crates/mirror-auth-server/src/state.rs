use anyhow::{Context, Result};
use mirror_auth_permissions::PermissionCatalog;
use mirror_auth_storage::RocksDbStorage;
use mirror_auth_users::{AuthorizationService, ServiceConfig, StorageIdentityStore};
use std::sync::Arc;

use crate::config::{Config, EnvRootAccount};

pub type UserService = AuthorizationService<StorageIdentityStore<RocksDbStorage>, EnvRootAccount>;

/// Application state shared by every transport handler
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        // Initialize storage
        let storage = Arc::new(RocksDbStorage::open(&config.database_path)?);

        let user_service = Arc::new(AuthorizationService::new(
            Arc::new(StorageIdentityStore::new(storage)),
            Arc::new(PermissionCatalog::builtin()),
            Arc::new(EnvRootAccount::new(config.root_account)),
            ServiceConfig::default(),
        ));

        Ok(AppState { user_service })
    }
}
