//! Display themes.

use crate::errors::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user's display theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Wire name of the theme
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// The opposite theme, for toggles
    pub fn other(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(AuthError::Validation(format!("invalid theme: {:?}", s))),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::default(), Theme::Dark);

        for input in ["aaaaaaaaaaaaaaaaa", "dark1234!", "Dark", ""] {
            assert!(
                matches!(input.parse::<Theme>(), Err(AuthError::Validation(_))),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn test_other() {
        assert_eq!(Theme::Dark.other(), Theme::Light);
        assert_eq!(Theme::Light.other(), Theme::Dark);
    }

    #[test]
    fn test_display_matches_parse() {
        for theme in [Theme::Dark, Theme::Light] {
            assert_eq!(theme.to_string().parse::<Theme>().unwrap(), theme);
        }
    }
}
