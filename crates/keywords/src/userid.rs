use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{KeywordError, Result};

// Name may not contain `<`, `(` or `)`; comment and email are each optional and
// the match is anchored at both ends so trailing garbage is rejected.
static USER_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?P<name>[^<()]*?)\s*(?:\((?P<comment>[^()]*)\))?\s*(?:<(?P<email>[^<>]*)>)?\s*$",
    )
    .expect("user id regex must compile")
});

/// The three segments of an OpenPGP user ID, borrowed from the input string.
///
/// Empty segments are reported as `None`, so `"()"` and a missing comment
/// look the same to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserIdParts<'a> {
    pub name: Option<&'a str>,
    pub comment: Option<&'a str>,
    pub email: Option<&'a str>,
}

/// Split a user ID of the form `Name (Comment) <email>` into its segments.
///
/// ```
/// use keyindex_keywords::parse_user_id;
///
/// let parts = parse_user_id("Alice Practice (Crystal Castles) <alice@example.com>").unwrap();
/// assert_eq!(parts.name, Some("Alice Practice"));
/// assert_eq!(parts.comment, Some("Crystal Castles"));
/// assert_eq!(parts.email, Some("alice@example.com"));
/// ```
pub fn parse_user_id(identity: &str) -> Result<UserIdParts<'_>> {
    let caps = USER_ID_REGEX
        .captures(identity)
        .ok_or_else(|| KeywordError::malformed(identity))?;

    let segment = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
    };

    Ok(UserIdParts {
        name: segment("name"),
        comment: segment("comment"),
        email: segment("email"),
    })
}

/// Strip control characters and replace decoding errors with `?`.
///
/// User IDs come from untrusted packets; the stored identity is cleaned the
/// same way before it is matched.
pub fn clean_user_id(identity: &str) -> String {
    identity
        .chars()
        .filter(|&c| !(c < '\u{20}' || c == '\u{7f}'))
        .map(|c| if c == char::REPLACEMENT_CHARACTER { '?' } else { c })
        .collect()
}
