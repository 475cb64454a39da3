use std::collections::HashSet;

use crate::config::{KeywordConfig, KeywordScheme};
use crate::error::Result;
use crate::normalize::{normalize_segment, retokenize_keywords};
use crate::userid::{clean_user_id, parse_user_id};

/// Derives search keywords for user IDs according to a [`KeywordConfig`].
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor {
    config: KeywordConfig,
}

impl KeywordExtractor {
    /// Create an extractor, validating the config first
    pub fn new(config: KeywordConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &KeywordConfig {
        &self.config
    }

    pub fn scheme(&self) -> KeywordScheme {
        self.config.scheme
    }

    /// Keywords for a `Name (Comment) <email>` user ID: normalized name, then
    /// comment, then lowercased email. Short and repeated entries are dropped.
    pub fn extract(&self, identity: &str) -> Result<Vec<String>> {
        let cleaned = clean_user_id(identity);
        let parts = parse_user_id(&cleaned)?;

        let name = normalize_segment(parts.name.unwrap_or_default(), self.config.min_token_len);
        let comment =
            normalize_segment(parts.comment.unwrap_or_default(), self.config.min_token_len);
        let email = parts.email.unwrap_or_default().to_lowercase();

        let mut seen = HashSet::new();
        let mut keywords = Vec::with_capacity(3);
        for candidate in [name, comment, email] {
            if candidate.chars().count() <= self.config.min_keyword_len {
                continue;
            }
            if seen.insert(candidate.clone()) {
                keywords.push(candidate);
            }
        }
        Ok(keywords)
    }

    /// Re-split previously stored keywords into single tokens.
    pub fn retokenize<S: AsRef<str>>(&self, existing: &[S]) -> Vec<String> {
        retokenize_keywords(existing, self.config.min_token_len)
    }

    /// Fresh keyword list for an identity under the configured scheme.
    ///
    /// The result always replaces `existing`; nothing from the old list is
    /// merged in unless the scheme derives it.
    pub fn keywords_for<S: AsRef<str>>(
        &self,
        identity: &str,
        existing: &[S],
    ) -> Result<Vec<String>> {
        match self.config.scheme {
            KeywordScheme::Identity => self.extract(identity),
            KeywordScheme::Retokenize => Ok(self.retokenize(existing)),
        }
    }
}

/// Extract keywords with the default configuration.
///
/// ```
/// use keyindex_keywords::extract_keywords;
///
/// let keywords = extract_keywords("Alice Example (work) <alice@example.com>").unwrap();
/// assert_eq!(keywords, vec!["alice example", "work", "alice@example.com"]);
/// ```
pub fn extract_keywords(identity: &str) -> Result<Vec<String>> {
    KeywordExtractor::default().extract(identity)
}
