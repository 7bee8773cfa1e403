//! User service implementation.

mod permissions;
mod registration;
mod root;
mod settings;

use crate::{config::*, errors::*, traits::*, types::*};
use async_trait::async_trait;
use mirror_auth_crypto::{hash_passphrase, verify_passphrase};
use mirror_auth_permissions::PermissionCatalog;
use std::sync::Arc;
use zeroize::Zeroizing;

/// User service implementation
///
/// Every operation runs in its own store transaction. The service keeps no
/// locks of its own and relies on the store for isolation.
pub struct AuthorizationService<S, R>
where
    S: IdentityStore,
    R: RootAccountSource,
{
    store: Arc<S>,
    catalog: Arc<PermissionCatalog>,
    root_account: Arc<R>,
    config: ServiceConfig,
}

impl<S, R> AuthorizationService<S, R>
where
    S: IdentityStore,
    R: RootAccountSource,
{
    /// Create a new user service
    pub fn new(
        store: Arc<S>,
        catalog: Arc<PermissionCatalog>,
        root_account: Arc<R>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            root_account,
            config,
        }
    }

    /// Hash on the blocking pool so Argon2 never stalls the runtime
    async fn hash(&self, passphrase: &str) -> Result<String> {
        let passphrase = Zeroizing::new(passphrase.as_bytes().to_vec());
        let params = self.config.hash_params;

        tokio::task::spawn_blocking(move || hash_passphrase(&passphrase, &params))
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {}", e)))?
            .map_err(AuthError::from)
    }

    async fn verify(&self, passphrase: &str, pw_hash: &str) -> Result<bool> {
        let passphrase = Zeroizing::new(passphrase.as_bytes().to_vec());
        let pw_hash = pw_hash.to_string();

        tokio::task::spawn_blocking(move || verify_passphrase(&passphrase, &pw_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("verification task failed: {}", e)))?
            .map_err(AuthError::from)
    }
}

#[async_trait]
impl<S, R> Authorization for AuthorizationService<S, R>
where
    S: IdentityStore + 'static,
    R: RootAccountSource + 'static,
{
    async fn register(&self, username: &str, passphrase: &str) -> Result<UserId> {
        self.register_internal(username, passphrase).await
    }

    async fn authenticate(&self, username: &str, passphrase: &str) -> Result<UserId> {
        self.authenticate_internal(username, passphrase).await
    }

    async fn user_settings(&self, uid: UserId) -> Result<UserSettings> {
        self.user_settings_internal(uid).await
    }

    async fn set_user_settings_theme(&self, uid: UserId, theme: &str) -> Result<UserSettings> {
        self.set_user_settings_theme_internal(uid, theme).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.list_users_internal().await
    }

    async fn user_permissions(&self, uid: UserId) -> Result<Vec<UserPermission>> {
        self.user_permissions_internal(uid).await
    }

    async fn grant_user_permission(
        &self,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
    ) -> Result<i64> {
        self.grant_user_permission_internal(uid, issuer_uid, name)
            .await
    }

    async fn revoke_user_permission(
        &self,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
    ) -> Result<i64> {
        self.revoke_user_permission_internal(uid, issuer_uid, name)
            .await
    }

    async fn sync_root_permissions(&self) -> Result<()> {
        self.sync_root_permissions_internal().await
    }

    async fn user_permission_history(&self, uid: UserId) -> Result<PermissionHistory> {
        self.user_permission_history_internal(uid).await
    }

    fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }
}
