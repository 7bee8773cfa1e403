//! User service trait definitions.

use crate::{errors::Result, theme::Theme, types::*};
use async_trait::async_trait;
use mirror_auth_permissions::{Permission, PermissionCatalog};
use mirror_auth_storage::Result as StorageResult;

/// Transactional persistence for users, settings, active permissions and
/// audit events
///
/// Every service operation runs inside one transaction opened by
/// [`IdentityStore::begin`].
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Open a transaction
    ///
    /// The transaction is isolated from every other open transaction and
    /// rolls back when dropped without a commit.
    async fn begin(&self) -> StorageResult<Box<dyn IdentityTransaction>>;
}

/// Reads and writes inside one store transaction
///
/// Lookups that find nothing return `Ok(None)` or an empty list. Writes are
/// only visible to other transactions after `commit`.
#[async_trait]
pub trait IdentityTransaction: Send {
    /// Insert a user with a fresh id
    ///
    /// Fails with `StorageError::AlreadyExists` if the username is taken.
    fn create_user(&mut self, username: &str, pw_hash: &str) -> StorageResult<User>;

    fn get_user(&self, uid: UserId) -> StorageResult<Option<User>>;

    fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// Every user, ordered by id
    fn list_users(&self) -> StorageResult<Vec<User>>;

    fn create_user_settings(&mut self, uid: UserId, theme: Theme) -> StorageResult<UserSettings>;

    fn get_user_settings(&self, uid: UserId) -> StorageResult<Option<UserSettings>>;

    /// Change a user's theme
    ///
    /// Returns `Ok(None)` if the user has no settings row.
    fn update_user_settings_theme(
        &mut self,
        uid: UserId,
        theme: Theme,
    ) -> StorageResult<Option<UserSettings>>;

    /// Active permission rows held by `uid`, ordered by row id
    fn list_user_permissions(&self, uid: UserId) -> StorageResult<Vec<UserPermission>>;

    /// Active permission rows naming `name`, ordered by row id
    fn list_user_permissions_by_name(&self, name: &str) -> StorageResult<Vec<UserPermission>>;

    fn get_user_permission_by_name(
        &self,
        uid: UserId,
        name: &str,
    ) -> StorageResult<Option<UserPermission>>;

    fn create_user_permission(
        &mut self,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
    ) -> StorageResult<UserPermission>;

    fn delete_user_permission(&mut self, id: i64) -> StorageResult<()>;

    /// Delete every active row naming `name`, returning how many went away
    fn delete_user_permissions_by_name(&mut self, name: &str) -> StorageResult<usize>;

    fn create_grant_event(
        &mut self,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
    ) -> StorageResult<GrantAuditEvent>;

    fn create_revocation_event(
        &mut self,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
        permission_id: i64,
    ) -> StorageResult<RevocationAuditEvent>;

    /// Grant events with `uid` as subject, ordered by event id
    fn list_grant_events(&self, uid: UserId) -> StorageResult<Vec<GrantAuditEvent>>;

    /// Revocation events with `uid` as subject, ordered by event id
    fn list_revocation_events(&self, uid: UserId) -> StorageResult<Vec<RevocationAuditEvent>>;

    async fn commit(self: Box<Self>) -> StorageResult<()>;

    fn rollback(self: Box<Self>);
}

/// Operations exposed to transports
///
/// Futures may be dropped at any point. A dropped operation rolls back
/// whatever it had not committed yet.
#[async_trait]
pub trait Authorization: Send + Sync {
    /// Create a user with default settings and return its id
    async fn register(&self, username: &str, passphrase: &str) -> Result<UserId>;

    /// Check credentials and return the user's id
    async fn authenticate(&self, username: &str, passphrase: &str) -> Result<UserId>;

    async fn user_settings(&self, uid: UserId) -> Result<UserSettings>;

    /// Set the theme (`"dark"` or `"light"`) and return the updated settings
    async fn set_user_settings_theme(&self, uid: UserId, theme: &str) -> Result<UserSettings>;

    async fn list_users(&self) -> Result<Vec<User>>;

    async fn user_permissions(&self, uid: UserId) -> Result<Vec<UserPermission>>;

    /// Grant `name` to `uid` on behalf of `issuer_uid`
    ///
    /// Returns the new row id, or 0 if `uid` already holds `name`.
    async fn grant_user_permission(&self, uid: UserId, issuer_uid: UserId, name: &str)
        -> Result<i64>;

    /// Revoke `name` from `uid` on behalf of `issuer_uid`
    ///
    /// Returns the removed row id, or 0 if `uid` did not hold `name`.
    async fn revoke_user_permission(
        &self,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
    ) -> Result<i64>;

    /// Move the root permissions to the configured root account
    async fn sync_root_permissions(&self) -> Result<()>;

    /// Grant and revocation audit trail for `uid`
    async fn user_permission_history(&self, uid: UserId) -> Result<PermissionHistory>;

    /// Catalog this service checks grants against
    fn catalog(&self) -> &PermissionCatalog;

    /// Every catalog entry, for listing to administrators
    fn permission_definitions(&self) -> &[Permission] {
        self.catalog().all()
    }
}
