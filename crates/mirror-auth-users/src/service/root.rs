//! Root permission synchronization.

use crate::{config::RootAccountSource, errors::*, traits::*, types::*};
use tracing::{debug, info};

use super::AuthorizationService;

impl<S, R> AuthorizationService<S, R>
where
    S: IdentityStore + 'static,
    R: RootAccountSource + 'static,
{
    /// Give the root permissions to the configured root account, and only to it
    ///
    /// The configured account is read and validated once, before anything is
    /// written, so a bad configuration leaves the current holder in place.
    /// The rest runs in two transactions. The first strips the root
    /// permissions from every holder; the second creates the root account if
    /// needed and grants them back. Between the two commits nobody holds
    /// root. Both steps are idempotent, so an interrupted run is repaired by
    /// running again.
    pub(crate) async fn sync_root_permissions_internal(&self) -> Result<()> {
        let root = self.root_account.root_account();
        self.config.username_rules.validate(&root.username)?;
        self.config.passphrase_rules.validate(&root.passphrase)?;

        let existing = {
            let txn = self.store.begin().await?;
            let user = txn.get_user_by_username(&root.username)?;
            txn.rollback();
            user
        };

        // Hash outside any transaction when the root account must be created
        let pw_hash = match existing {
            Some(_) => None,
            None => Some(self.hash(&root.passphrase).await?),
        };

        let mut txn = self.store.begin().await?;
        let revoked = self.revoke_root_in(txn.as_mut())?;
        txn.commit().await?;
        debug!(revoked, "Root permissions cleared");

        let mut txn = self.store.begin().await?;
        let uid = match (txn.get_user_by_username(&root.username)?, pw_hash) {
            (Some(user), _) => user.id,
            (None, Some(pw_hash)) => {
                let uid =
                    self.register_in(txn.as_mut(), &root.username, &pw_hash, &root.username)?;
                info!(uid, username = %root.username, "Root account created");
                uid
            }
            (None, None) => {
                // Users are never deleted, so the account seen above still exists
                return Err(AuthError::Internal(format!(
                    "root account {:?} vanished during synchronization",
                    root.username
                )));
            }
        };
        self.grant_root_in(txn.as_mut(), uid)?;
        txn.commit().await?;

        info!(uid, username = %root.username, "Root permissions synchronized");
        Ok(())
    }

    /// Strip every root permission from every holder inside `txn`
    ///
    /// Each removed row gets a revocation event issued by the system.
    /// Returns how many rows were removed.
    pub(crate) fn revoke_root_in(&self, txn: &mut dyn IdentityTransaction) -> Result<usize> {
        let mut revoked = 0;

        for permission in self.catalog.root() {
            let holders = txn.list_user_permissions_by_name(&permission.name)?;
            for holder in &holders {
                txn.create_revocation_event(holder.uid, SYSTEM_UID, &holder.name, holder.id)?;
            }
            revoked += txn.delete_user_permissions_by_name(&permission.name)?;
        }

        Ok(revoked)
    }

    /// Grant every root permission to `uid` inside `txn`
    pub(crate) fn grant_root_in(
        &self,
        txn: &mut dyn IdentityTransaction,
        uid: UserId,
    ) -> Result<()> {
        for permission in self.catalog.root() {
            self.grant_in(txn, uid, SYSTEM_UID, &permission.name)?;
        }
        Ok(())
    }
}
