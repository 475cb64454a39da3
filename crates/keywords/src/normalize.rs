use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

// Delimiters used by the keyword fields written before user IDs were parsed
// into segments: whitespace plus the punctuation of `Name (Comment) <a@b>`.
static LEGACY_DELIMITERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s<>()@,]+").expect("delimiter regex must compile"));

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Lowercase a name or comment, split it on non-word characters and join the
/// tokens longer than `min_token_len` with single spaces.
///
/// ```
/// use keyindex_keywords::normalize_segment;
///
/// assert_eq!(normalize_segment("John W. Smoke", 2), "john smoke");
/// ```
pub fn normalize_segment(segment: &str, min_token_len: usize) -> String {
    segment
        .to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|token| char_len(token) > min_token_len)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split stored keyword strings back into single lowercase tokens.
///
/// Tokens longer than `min_token_len` survive; duplicates are dropped with
/// the first occurrence keeping its position.
pub fn retokenize_keywords<S: AsRef<str>>(keywords: &[S], min_token_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for keyword in keywords {
        for part in LEGACY_DELIMITERS.split(keyword.as_ref()) {
            if char_len(part) <= min_token_len {
                continue;
            }
            let part = part.to_lowercase();
            if seen.insert(part.clone()) {
                out.push(part);
            }
        }
    }
    out
}
