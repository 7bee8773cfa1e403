//! Registration and authentication.

use crate::{config::RootAccountSource, errors::*, theme::Theme, traits::*, types::*};
use mirror_auth_storage::StorageError;
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

use super::AuthorizationService;

impl<S, R> AuthorizationService<S, R>
where
    S: IdentityStore + 'static,
    R: RootAccountSource + 'static,
{
    /// Register a new user
    ///
    /// Registering the configured root username moves the root permissions
    /// to the new user in the same transaction.
    pub(crate) async fn register_internal(
        &self,
        username: &str,
        passphrase: &str,
    ) -> Result<UserId> {
        self.config.username_rules.validate(username)?;
        self.config.passphrase_rules.validate(passphrase)?;

        // Hash before the transaction opens so the store is not held during Argon2
        let pw_hash = self.hash(passphrase).await?;
        let root = self.root_account.root_account();

        let mut txn = self.store.begin().await?;
        let uid = self.register_in(txn.as_mut(), username, &pw_hash, &root.username)?;
        txn.commit().await?;

        info!(uid, username, "User registered");
        Ok(uid)
    }

    /// Insert a user and its default settings inside `txn`
    pub(crate) fn register_in(
        &self,
        txn: &mut dyn IdentityTransaction,
        username: &str,
        pw_hash: &str,
        root_username: &str,
    ) -> Result<UserId> {
        let user = txn.create_user(username, pw_hash).map_err(|e| match e {
            StorageError::AlreadyExists => {
                AuthError::Conflict(format!("username {:?} is already taken", username))
            }
            other => AuthError::Storage(other),
        })?;

        txn.create_user_settings(user.id, Theme::default())?;

        if username == root_username {
            let revoked = self.revoke_root_in(txn)?;
            self.grant_root_in(txn, user.id)?;
            info!(uid = user.id, revoked, "Root permissions moved to newly registered user");
        }

        Ok(user.id)
    }

    /// Check a username and passphrase
    ///
    /// An unknown username is rejected only after a random delay, so response
    /// time does not reveal which usernames exist. The delay runs after the
    /// transaction has closed.
    pub(crate) async fn authenticate_internal(
        &self,
        username: &str,
        passphrase: &str,
    ) -> Result<UserId> {
        let txn = self.store.begin().await?;
        let user = txn.get_user_by_username(username)?;
        txn.commit().await?;

        let Some(user) = user else {
            let delay = self.unknown_user_delay();
            warn!("Authentication failed: unknown username");
            tokio::time::sleep(delay).await;
            return Err(AuthError::Unauthenticated);
        };

        if !self.verify(passphrase, &user.pw_hash).await? {
            warn!(uid = user.id, "Authentication failed: wrong passphrase");
            return Err(AuthError::Unauthenticated);
        }

        info!(uid = user.id, "User authenticated");
        Ok(user.id)
    }

    fn unknown_user_delay(&self) -> Duration {
        let min = self.config.unknown_user_delay_min;
        let max = self.config.unknown_user_delay_max;
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}
