use anyhow::Result;
use mirror_auth_users::{RootAccount, RootAccountSource, UsernameRules};
use std::path::PathBuf;
use zeroize::Zeroizing;

const ROOT_USERNAME: &str = "ROOT_USERNAME";
const ROOT_PASSPHRASE: &str = "ROOT_PASSPHRASE";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to RocksDB database
    pub database_path: PathBuf,

    /// Root account as configured at boot
    pub root_account: RootAccount,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("DATABASE_PATH")
            .unwrap_or_else(|| "./data/mirror-auth.db".to_string())
            .into();

        let Some(root_username) = lookup(ROOT_USERNAME) else {
            anyhow::bail!("{} environment variable required", ROOT_USERNAME);
        };
        let Some(root_passphrase) = lookup(ROOT_PASSPHRASE).map(Zeroizing::new) else {
            anyhow::bail!("{} environment variable required", ROOT_PASSPHRASE);
        };

        if let Err(e) = UsernameRules::default().validate(&root_username) {
            anyhow::bail!("{} is not a valid username: {}", ROOT_USERNAME, e);
        }

        Ok(Config {
            database_path,
            root_account: RootAccount {
                username: root_username,
                passphrase: root_passphrase,
            },
        })
    }
}

/// Root account read from the environment on every use
///
/// Falls back to the account seen at boot if a variable has been removed
/// since.
pub struct EnvRootAccount {
    boot: RootAccount,
}

impl EnvRootAccount {
    pub fn new(boot: RootAccount) -> Self {
        Self { boot }
    }
}

impl RootAccountSource for EnvRootAccount {
    fn root_account(&self) -> RootAccount {
        let username =
            std::env::var(ROOT_USERNAME).unwrap_or_else(|_| self.boot.username.clone());
        let passphrase = match std::env::var(ROOT_PASSPHRASE) {
            Ok(passphrase) => Zeroizing::new(passphrase),
            Err(_) => self.boot.passphrase.clone(),
        };

        RootAccount {
            username,
            passphrase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("ROOT_USERNAME", "root"),
            ("ROOT_PASSPHRASE", "Root_passphrase_1"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("./data/mirror-auth.db"));
        assert_eq!(config.root_account.username, "root");
        assert_eq!(config.root_account.passphrase.as_str(), "Root_passphrase_1");
    }

    #[test]
    fn test_database_path_override() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_PATH", "/var/lib/mirror-auth"),
            ("ROOT_USERNAME", "root"),
            ("ROOT_PASSPHRASE", "Root_passphrase_1"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/mirror-auth"));
    }

    #[test]
    fn test_root_account_required() {
        assert!(Config::from_lookup(lookup_from(&[("ROOT_USERNAME", "root")])).is_err());
        assert!(
            Config::from_lookup(lookup_from(&[("ROOT_PASSPHRASE", "Root_passphrase_1")]))
                .is_err()
        );
    }

    #[test]
    fn test_invalid_root_username_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("ROOT_USERNAME", "Root User"),
            ("ROOT_PASSPHRASE", "Root_passphrase_1"),
        ]));
        assert!(result.is_err());
    }
}
