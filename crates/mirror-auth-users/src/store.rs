//! Identity store backed by the generic key-value [`Storage`].

use crate::{
    theme::Theme,
    traits::{IdentityStore, IdentityTransaction},
    types::*,
};
use async_trait::async_trait;
use mirror_auth_crypto::current_timestamp;
use mirror_auth_storage::{
    Result as StorageResult, Storage, StorageError, Transaction, TransactionExt,
    CF_PERMISSION_GRANTS, CF_PERMISSION_REVOCATIONS, CF_SEQUENCES, CF_USERS,
    CF_USERS_BY_USERNAME, CF_USER_PERMISSIONS, CF_USER_PERMISSIONS_BY_NAME,
    CF_USER_PERMISSIONS_BY_USER, CF_USER_SETTINGS,
};
use std::sync::Arc;

/// [`IdentityStore`] over any transactional key-value storage
pub struct StorageIdentityStore<S: Storage> {
    storage: Arc<S>,
}

impl<S: Storage> StorageIdentityStore<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: Storage + 'static> IdentityStore for StorageIdentityStore<S> {
    async fn begin(&self) -> StorageResult<Box<dyn IdentityTransaction>> {
        let txn = self.storage.begin_transaction().await?;
        Ok(Box::new(StorageIdentityTransaction { txn }))
    }
}

/// One open storage transaction
pub struct StorageIdentityTransaction {
    txn: Box<dyn Transaction>,
}

impl StorageIdentityTransaction {
    /// Allocate the next id of `table`, starting at 1
    fn next_id(&mut self, table: &str) -> StorageResult<i64> {
        let last: i64 = self.txn.get(CF_SEQUENCES, table)?.unwrap_or(0);
        let next = last + 1;
        self.txn.put(CF_SEQUENCES, table, &next)?;
        Ok(next)
    }

    fn load_permissions(&self, ids: Vec<i64>) -> StorageResult<Vec<UserPermission>> {
        let mut permissions = Vec::with_capacity(ids.len());
        for id in ids {
            let permission: UserPermission = self
                .txn
                .get(CF_USER_PERMISSIONS, &id)?
                .ok_or(StorageError::NotFound)?;
            permissions.push(permission);
        }
        permissions.sort_by_key(|p| p.id);
        Ok(permissions)
    }
}

#[async_trait]
impl IdentityTransaction for StorageIdentityTransaction {
    fn create_user(&mut self, username: &str, pw_hash: &str) -> StorageResult<User> {
        if self.txn.exists(CF_USERS_BY_USERNAME, username)? {
            return Err(StorageError::AlreadyExists);
        }

        let user = User {
            id: self.next_id(CF_USERS)?,
            username: username.to_string(),
            pw_hash: pw_hash.to_string(),
            created_at: current_timestamp(),
        };

        self.txn.put(CF_USERS, &user.id, &user)?;
        self.txn.put(CF_USERS_BY_USERNAME, username, &user.id)?;

        Ok(user)
    }

    fn get_user(&self, uid: UserId) -> StorageResult<Option<User>> {
        self.txn.get(CF_USERS, &uid)
    }

    fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        match self.txn.get::<_, UserId>(CF_USERS_BY_USERNAME, username)? {
            Some(uid) => self.txn.get(CF_USERS, &uid),
            None => Ok(None),
        }
    }

    fn list_users(&self) -> StorageResult<Vec<User>> {
        let mut users: Vec<User> = self
            .txn
            .get_all(CF_USERS)?
            .into_iter()
            .map(|(_, user)| user)
            .collect();
        // Little-endian keys do not iterate in numeric order
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    fn create_user_settings(&mut self, uid: UserId, theme: Theme) -> StorageResult<UserSettings> {
        let now = current_timestamp();
        let settings = UserSettings {
            id: self.next_id(CF_USER_SETTINGS)?,
            uid,
            theme,
            created_at: now,
            updated_at: now,
        };
        self.txn.put(CF_USER_SETTINGS, &uid, &settings)?;
        Ok(settings)
    }

    fn get_user_settings(&self, uid: UserId) -> StorageResult<Option<UserSettings>> {
        self.txn.get(CF_USER_SETTINGS, &uid)
    }

    fn update_user_settings_theme(
        &mut self,
        uid: UserId,
        theme: Theme,
    ) -> StorageResult<Option<UserSettings>> {
        let Some(mut settings) = self.get_user_settings(uid)? else {
            return Ok(None);
        };

        settings.theme = theme;
        settings.updated_at = current_timestamp();
        self.txn.put(CF_USER_SETTINGS, &uid, &settings)?;

        Ok(Some(settings))
    }

    fn list_user_permissions(&self, uid: UserId) -> StorageResult<Vec<UserPermission>> {
        let ids = self
            .txn
            .get_by_prefix::<_, i64>(CF_USER_PERMISSIONS_BY_USER, &uid)?
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        self.load_permissions(ids)
    }

    fn list_user_permissions_by_name(&self, name: &str) -> StorageResult<Vec<UserPermission>> {
        let ids = self
            .txn
            .get_by_prefix::<_, i64>(CF_USER_PERMISSIONS_BY_NAME, name)?
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        self.load_permissions(ids)
    }

    fn get_user_permission_by_name(
        &self,
        uid: UserId,
        name: &str,
    ) -> StorageResult<Option<UserPermission>> {
        match self
            .txn
            .get::<_, i64>(CF_USER_PERMISSIONS_BY_USER, &(uid, name))?
        {
            Some(id) => self.txn.get(CF_USER_PERMISSIONS, &id),
            None => Ok(None),
        }
    }

    fn create_user_permission(
        &mut self,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
    ) -> StorageResult<UserPermission> {
        let permission = UserPermission {
            id: self.next_id(CF_USER_PERMISSIONS)?,
            uid,
            issuer_uid,
            name: name.to_string(),
            created_at: current_timestamp(),
        };

        self.txn
            .put(CF_USER_PERMISSIONS, &permission.id, &permission)?;
        self.txn
            .put(CF_USER_PERMISSIONS_BY_USER, &(uid, name), &permission.id)?;
        self.txn
            .put(CF_USER_PERMISSIONS_BY_NAME, &(name, uid), &permission.id)?;

        Ok(permission)
    }

    fn delete_user_permission(&mut self, id: i64) -> StorageResult<()> {
        let Some(permission) = self.txn.get::<_, UserPermission>(CF_USER_PERMISSIONS, &id)? else {
            return Ok(());
        };

        let name = permission.name.as_str();
        self.txn.delete(CF_USER_PERMISSIONS, &id)?;
        self.txn
            .delete(CF_USER_PERMISSIONS_BY_USER, &(permission.uid, name))?;
        self.txn
            .delete(CF_USER_PERMISSIONS_BY_NAME, &(name, permission.uid))?;

        Ok(())
    }

    fn delete_user_permissions_by_name(&mut self, name: &str) -> StorageResult<usize> {
        let permissions = self.list_user_permissions_by_name(name)?;
        for permission in &permissions {
            self.delete_user_permission(permission.id)?;
        }
        Ok(permissions.len())
    }

    fn create_grant_event(
        &mut self,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
    ) -> StorageResult<GrantAuditEvent> {
        let event = GrantAuditEvent {
            id: self.next_id(CF_PERMISSION_GRANTS)?,
            uid,
            issuer_uid,
            name: name.to_string(),
            created_at: current_timestamp(),
        };
        self.txn
            .put(CF_PERMISSION_GRANTS, &(uid, event.id), &event)?;
        Ok(event)
    }

    fn create_revocation_event(
        &mut self,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
        permission_id: i64,
    ) -> StorageResult<RevocationAuditEvent> {
        let event = RevocationAuditEvent {
            id: self.next_id(CF_PERMISSION_REVOCATIONS)?,
            uid,
            issuer_uid,
            name: name.to_string(),
            permission_id,
            created_at: current_timestamp(),
        };
        self.txn
            .put(CF_PERMISSION_REVOCATIONS, &(uid, event.id), &event)?;
        Ok(event)
    }

    fn list_grant_events(&self, uid: UserId) -> StorageResult<Vec<GrantAuditEvent>> {
        let mut events: Vec<GrantAuditEvent> = self
            .txn
            .get_by_prefix(CF_PERMISSION_GRANTS, &uid)?
            .into_iter()
            .map(|(_, event)| event)
            .collect();
        events.sort_by_key(|e| e.id);
        Ok(events)
    }

    fn list_revocation_events(&self, uid: UserId) -> StorageResult<Vec<RevocationAuditEvent>> {
        let mut events: Vec<RevocationAuditEvent> = self
            .txn
            .get_by_prefix(CF_PERMISSION_REVOCATIONS, &uid)?
            .into_iter()
            .map(|(_, event)| event)
            .collect();
        events.sort_by_key(|e| e.id);
        Ok(events)
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        self.txn.commit().await
    }

    fn rollback(self: Box<Self>) {
        self.txn.rollback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_auth_storage::RocksDbStorage;

    fn store() -> StorageIdentityStore<RocksDbStorage> {
        StorageIdentityStore::new(Arc::new(RocksDbStorage::open_test().unwrap()))
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let store = store();

        let mut txn = store.begin().await.unwrap();
        let user = txn.create_user("alice", "hash").unwrap();
        assert_eq!(user.id, 1);
        txn.commit().await.unwrap();

        let txn = store.begin().await.unwrap();
        assert_eq!(txn.get_user(1).unwrap(), Some(user.clone()));
        assert_eq!(txn.get_user_by_username("alice").unwrap(), Some(user));
        assert_eq!(txn.get_user_by_username("bob").unwrap(), None);
        assert_eq!(txn.get_user(2).unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let store = store();

        let mut txn = store.begin().await.unwrap();
        txn.create_user("alice", "hash").unwrap();
        assert!(matches!(
            txn.create_user("alice", "other"),
            Err(StorageError::AlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_listed_in_order() {
        let store = store();

        let mut txn = store.begin().await.unwrap();
        // Enough users that little-endian key order differs from id order
        for i in 0..300 {
            txn.create_user(&format!("user{}", i), "hash").unwrap();
        }
        txn.commit().await.unwrap();

        let txn = store.begin().await.unwrap();
        let ids: Vec<i64> = txn.list_users().unwrap().iter().map(|u| u.id).collect();
        let expected: Vec<i64> = (1..=300).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_rolled_back_ids_are_reused() {
        let store = store();

        let mut txn = store.begin().await.unwrap();
        txn.create_user("alice", "hash").unwrap();
        txn.rollback();

        let mut txn = store.begin().await.unwrap();
        let user = txn.create_user("bob", "hash").unwrap();
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn test_settings() {
        let store = store();

        let mut txn = store.begin().await.unwrap();
        let settings = txn.create_user_settings(1, Theme::Dark).unwrap();
        assert_eq!(settings.theme, Theme::Dark);

        let updated = txn.update_user_settings_theme(1, Theme::Light).unwrap();
        assert_eq!(updated.map(|s| s.theme), Some(Theme::Light));
        assert_eq!(txn.update_user_settings_theme(2, Theme::Light).unwrap(), None);
        assert_eq!(txn.get_user_settings(2).unwrap(), None);
    }

    #[tokio::test]
    async fn test_permission_indexes() {
        let store = store();

        let mut txn = store.begin().await.unwrap();
        let a = txn.create_user_permission(1, 0, "create-room").unwrap();
        let b = txn.create_user_permission(1, 0, "view-all-rooms").unwrap();
        let c = txn.create_user_permission(2, 0, "create-room").unwrap();
        txn.commit().await.unwrap();

        let mut txn = store.begin().await.unwrap();
        assert_eq!(txn.list_user_permissions(1).unwrap(), vec![a.clone(), b.clone()]);
        assert_eq!(
            txn.list_user_permissions_by_name("create-room").unwrap(),
            vec![a.clone(), c.clone()]
        );
        assert_eq!(
            txn.get_user_permission_by_name(2, "create-room").unwrap(),
            Some(c)
        );
        assert_eq!(txn.get_user_permission_by_name(2, "view-all-rooms").unwrap(), None);

        txn.delete_user_permission(a.id).unwrap();
        assert_eq!(txn.list_user_permissions(1).unwrap(), vec![b]);

        assert_eq!(txn.delete_user_permissions_by_name("create-room").unwrap(), 1);
        assert!(txn.list_user_permissions(2).unwrap().is_empty());
        assert!(txn
            .list_user_permissions_by_name("create-room")
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_audit_events() {
        let store = store();

        let mut txn = store.begin().await.unwrap();
        txn.create_grant_event(1, 5, "create-room").unwrap();
        txn.create_grant_event(2, 5, "create-room").unwrap();
        txn.create_grant_event(1, 5, "view-all-rooms").unwrap();
        let revocation = txn.create_revocation_event(1, 5, "create-room", 3).unwrap();
        txn.commit().await.unwrap();

        let txn = store.begin().await.unwrap();
        let grants = txn.list_grant_events(1).unwrap();
        let names: Vec<&str> = grants.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["create-room", "view-all-rooms"]);
        assert_eq!(txn.list_revocation_events(1).unwrap(), vec![revocation]);
        assert!(txn.list_revocation_events(2).unwrap().is_empty());
    }
}
