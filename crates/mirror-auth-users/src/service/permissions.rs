//! Permission grants, revocations and their audit trail.

use crate::{config::RootAccountSource, errors::*, traits::*, types::*};
use mirror_auth_permissions::PermissionSet;
use tracing::{debug, info, warn};

use super::AuthorizationService;

impl<S, R> AuthorizationService<S, R>
where
    S: IdentityStore + 'static,
    R: RootAccountSource + 'static,
{
    /// List a user's active permissions
    pub(crate) async fn user_permissions_internal(
        &self,
        uid: UserId,
    ) -> Result<Vec<UserPermission>> {
        let txn = self.store.begin().await?;
        let permissions = txn.list_user_permissions(uid)?;
        txn.commit().await?;
        Ok(permissions)
    }

    /// Grant a permission on behalf of an issuer
    ///
    /// The issuer's permissions are read in the same transaction as the
    /// write, so a concurrent revocation cannot be bypassed.
    pub(crate) async fn grant_user_permission_internal(
        &self,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
    ) -> Result<i64> {
        let mut txn = self.store.begin().await?;

        let issuer_rows = txn.list_user_permissions(issuer_uid)?;
        let issuer = PermissionSet::new(&self.catalog, issuer_uid, &issuer_rows);
        if !issuer.can_grant(name) {
            warn!(issuer_uid, uid, permission = name, "Grant denied");
            return Err(AuthError::PermissionDenied(format!(
                "user {} cannot grant {:?}",
                issuer_uid, name
            )));
        }

        if txn.get_user(uid)?.is_none() {
            return Err(AuthError::NotFound(format!("user {}", uid)));
        }

        let id = self.grant_in(txn.as_mut(), uid, issuer_uid, name)?;
        txn.commit().await?;

        if id == 0 {
            debug!(uid, permission = name, "Permission already held");
        } else {
            info!(uid, issuer_uid, permission = name, id, "Permission granted");
        }
        Ok(id)
    }

    /// Revoke a permission on behalf of an issuer
    pub(crate) async fn revoke_user_permission_internal(
        &self,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
    ) -> Result<i64> {
        let mut txn = self.store.begin().await?;

        let issuer_rows = txn.list_user_permissions(issuer_uid)?;
        let issuer = PermissionSet::new(&self.catalog, issuer_uid, &issuer_rows);
        if !issuer.can_revoke(name) {
            warn!(issuer_uid, uid, permission = name, "Revocation denied");
            return Err(AuthError::PermissionDenied(format!(
                "user {} cannot revoke {:?}",
                issuer_uid, name
            )));
        }

        if txn.get_user(uid)?.is_none() {
            return Err(AuthError::NotFound(format!("user {}", uid)));
        }

        let id = self.revoke_in(txn.as_mut(), uid, issuer_uid, name)?;
        txn.commit().await?;

        if id == 0 {
            debug!(uid, permission = name, "Permission not held");
        } else {
            info!(uid, issuer_uid, permission = name, id, "Permission revoked");
        }
        Ok(id)
    }

    /// Read the grant and revocation history of a user
    pub(crate) async fn user_permission_history_internal(
        &self,
        uid: UserId,
    ) -> Result<PermissionHistory> {
        let txn = self.store.begin().await?;
        let history = PermissionHistory {
            grants: txn.list_grant_events(uid)?,
            revocations: txn.list_revocation_events(uid)?,
        };
        txn.commit().await?;
        Ok(history)
    }

    /// Grant `name` to `uid` inside `txn` without any authorization check
    ///
    /// Returns 0 if `uid` already holds `name`.
    pub(crate) fn grant_in(
        &self,
        txn: &mut dyn IdentityTransaction,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
    ) -> Result<i64> {
        if txn.get_user_permission_by_name(uid, name)?.is_some() {
            return Ok(0);
        }

        let permission = txn.create_user_permission(uid, issuer_uid, name)?;
        txn.create_grant_event(uid, issuer_uid, name)?;

        Ok(permission.id)
    }

    /// Revoke `name` from `uid` inside `txn` without any authorization check
    ///
    /// Returns the removed row id, or 0 if `uid` does not hold `name`.
    pub(crate) fn revoke_in(
        &self,
        txn: &mut dyn IdentityTransaction,
        uid: UserId,
        issuer_uid: UserId,
        name: &str,
    ) -> Result<i64> {
        let Some(permission) = txn.get_user_permission_by_name(uid, name)? else {
            return Ok(0);
        };

        txn.delete_user_permission(permission.id)?;
        txn.create_revocation_event(uid, issuer_uid, name, permission.id)?;

        Ok(permission.id)
    }
}
