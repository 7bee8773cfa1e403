//! User service configuration.

use crate::validation::{PassphraseRules, UsernameRules};
use mirror_auth_crypto::HashParams;
use std::sync::RwLock;
use std::time::Duration;
use zeroize::Zeroizing;

/// Settings fixed when the service is built
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Argon2id parameters for new hashes
    pub hash_params: HashParams,
    pub username_rules: UsernameRules,
    pub passphrase_rules: PassphraseRules,
    /// Lower bound of the delay before rejecting an unknown username
    pub unknown_user_delay_min: Duration,
    /// Upper bound of the delay before rejecting an unknown username
    pub unknown_user_delay_max: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            hash_params: HashParams::default(),
            username_rules: UsernameRules::default(),
            passphrase_rules: PassphraseRules::default(),
            unknown_user_delay_min: Duration::from_secs(2),
            unknown_user_delay_max: Duration::from_secs(3),
        }
    }
}

/// Credentials of the account that holds the root permissions
#[derive(Clone)]
pub struct RootAccount {
    pub username: String,
    pub passphrase: Zeroizing<String>,
}

impl RootAccount {
    pub fn new(username: impl Into<String>, passphrase: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            passphrase: Zeroizing::new(passphrase.into()),
        }
    }
}

impl std::fmt::Debug for RootAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootAccount")
            .field("username", &self.username)
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// Source of the current root account
///
/// Read on every registration and root synchronization, never cached, so a
/// changed configuration followed by a new synchronization moves the root
/// permissions to the new account.
pub trait RootAccountSource: Send + Sync {
    fn root_account(&self) -> RootAccount;
}

impl RootAccountSource for RootAccount {
    fn root_account(&self) -> RootAccount {
        self.clone()
    }
}

impl RootAccountSource for RwLock<RootAccount> {
    fn root_account(&self) -> RootAccount {
        // A poisoned lock still holds a complete value
        match self.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
