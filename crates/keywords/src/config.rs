use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KeywordError, Result};

/// Keywords of this length or shorter are never stored
pub const MIN_KEYWORD_LEN: usize = 3;

/// Tokens of this length or shorter are dropped before joining
pub const MIN_TOKEN_LEN: usize = 2;

/// Configuration for keyword derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeywordConfig {
    /// Which derivation rule to apply
    pub scheme: KeywordScheme,

    /// Whole keywords with `len <= min_keyword_len` are dropped
    pub min_keyword_len: usize,

    /// Name/comment tokens with `len <= min_token_len` are dropped
    pub min_token_len: usize,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            scheme: KeywordScheme::Identity,
            min_keyword_len: MIN_KEYWORD_LEN,
            min_token_len: MIN_TOKEN_LEN,
        }
    }
}

impl KeywordConfig {
    /// Config for the given scheme with default thresholds
    pub fn for_scheme(scheme: KeywordScheme) -> Self {
        Self {
            scheme,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_token_len == 0 {
            return Err(KeywordError::invalid_config(
                "min_token_len must be > 0 (empty tokens would survive splitting)",
            ));
        }

        if self.min_token_len > self.min_keyword_len {
            return Err(KeywordError::invalid_config(format!(
                "min_token_len ({}) cannot exceed min_keyword_len ({})",
                self.min_token_len, self.min_keyword_len
            )));
        }

        Ok(())
    }
}

/// Rule used to derive the keyword list of an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordScheme {
    /// Parse `Name (Comment) <email>` and emit one normalized keyword per segment
    #[default]
    Identity,

    /// Re-split the keywords already stored on the identity into single tokens
    Retokenize,
}

impl KeywordScheme {
    pub const fn as_str(self) -> &'static str {
        match self {
            KeywordScheme::Identity => "identity",
            KeywordScheme::Retokenize => "retokenize",
        }
    }
}

impl fmt::Display for KeywordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeywordScheme {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" => Ok(Self::Identity),
            "retokenize" => Ok(Self::Retokenize),
            other => Err(KeywordError::UnknownScheme(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = KeywordConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scheme, KeywordScheme::Identity);
    }

    #[test]
    fn test_config_validation() {
        let mut config = KeywordConfig::default();

        config.min_token_len = 0;
        assert!(config.validate().is_err());

        config.min_token_len = 5;
        config.min_keyword_len = 3;
        assert!(config.validate().is_err());

        config.min_token_len = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scheme_parse() {
        assert_eq!("identity".parse::<KeywordScheme>(), Ok(KeywordScheme::Identity));
        assert_eq!(
            " Retokenize ".parse::<KeywordScheme>(),
            Ok(KeywordScheme::Retokenize)
        );
        assert!("words".parse::<KeywordScheme>().is_err());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: KeywordConfig =
            serde_json::from_str(r#"{"scheme":"retokenize"}"#).expect("deserialize");
        assert_eq!(config.scheme, KeywordScheme::Retokenize);
        assert_eq!(config.min_keyword_len, MIN_KEYWORD_LEN);
        assert_eq!(config.min_token_len, MIN_TOKEN_LEN);
    }
}
