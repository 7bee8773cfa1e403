//! Username and passphrase validation.

use crate::errors::{AuthError, Result};

/// Characters allowed in a passphrase besides ASCII letters and digits
const PASSPHRASE_SYMBOLS: &str = "_!@#$%^&* ";

/// Username rules: lowercase ASCII letters and digits only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsernameRules {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for UsernameRules {
    fn default() -> Self {
        Self {
            min_length: 4,
            max_length: 16,
        }
    }
}

impl UsernameRules {
    /// Whether `username` satisfies these rules
    pub fn is_valid(&self, username: &str) -> bool {
        self.validate(username).is_ok()
    }

    /// Validate a username
    ///
    /// Length is counted in characters.
    pub fn validate(&self, username: &str) -> Result<()> {
        check_length("username", username, self.min_length, self.max_length)?;

        if !username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(AuthError::Validation(
                "username may only contain lowercase letters and digits".to_string(),
            ));
        }

        Ok(())
    }
}

/// Passphrase rules: ASCII letters, digits, spaces and `_!@#$%^&*`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassphraseRules {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PassphraseRules {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 255,
        }
    }
}

impl PassphraseRules {
    /// Whether `passphrase` satisfies these rules
    pub fn is_valid(&self, passphrase: &str) -> bool {
        self.validate(passphrase).is_ok()
    }

    /// Validate a passphrase
    ///
    /// Error messages never echo the passphrase.
    pub fn validate(&self, passphrase: &str) -> Result<()> {
        check_length("passphrase", passphrase, self.min_length, self.max_length)?;

        if !passphrase
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSPHRASE_SYMBOLS.contains(c))
        {
            return Err(AuthError::Validation(format!(
                "passphrase may only contain letters, digits and {:?}",
                PASSPHRASE_SYMBOLS
            )));
        }

        Ok(())
    }
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    if value.is_empty() {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }

    let len = value.chars().count();
    if len < min || len > max {
        return Err(AuthError::Validation(format!(
            "{} must be between {} and {} characters",
            field, min, max
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        let rules = UsernameRules::default();

        let cases = [
            ("too short", "a".repeat(3), false),
            ("normal", "test".to_string(), true),
            ("normal but long", format!("test{}", "a".repeat(10)), true),
            ("max length", "a".repeat(16), true),
            ("too long", "a".repeat(17), false),
            ("empty", String::new(), false),
            ("uppercase", "Alice".to_string(), false),
            ("digits", "user2024".to_string(), true),
            ("punctuation", "al_ice".to_string(), false),
            ("space", "al ice".to_string(), false),
            ("non-ascii", "ålice".to_string(), false),
        ];

        for (name, input, expected) in cases {
            assert_eq!(rules.is_valid(&input), expected, "{}", name);
        }
    }

    #[test]
    fn test_passphrase_rules() {
        let rules = PassphraseRules::default();

        let cases = [
            ("too short", "a".repeat(3), false),
            ("normal", "T3sted tested".to_string(), true),
            ("special characters", "!@#$%^&*".to_string(), true),
            (
                "long normal",
                format!("T3sted tested{}", "a".repeat(242)),
                true,
            ),
            ("too long", "a".repeat(256), false),
            ("underscore", "Secret_123".to_string(), true),
            ("disallowed symbol", "Secret-123".to_string(), false),
            ("tab", "Secret\t123".to_string(), false),
            ("empty", String::new(), false),
        ];

        for (name, input, expected) in cases {
            assert_eq!(rules.is_valid(&input), expected, "{}", name);
        }
    }

    #[test]
    fn test_passphrase_error_does_not_echo_input() {
        let rules = PassphraseRules::default();
        let err = rules.validate("hunter2-hunter2").unwrap_err();
        assert!(!err.to_string().contains("hunter2"));
    }

    #[test]
    fn test_custom_limits() {
        let rules = UsernameRules {
            min_length: 2,
            max_length: 3,
        };
        assert!(rules.is_valid("ab"));
        assert!(!rules.is_valid("abcd"));
    }
}
