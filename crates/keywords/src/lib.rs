//! # Keyindex Keywords
//!
//! Search keyword derivation for OpenPGP user IDs.
//!
//! ## Pipeline
//!
//! ```text
//! "Alice Example (work) <Alice@Example.com>"
//!     │
//!     ├──> Clean (strip control characters)
//!     │
//!     ├──> Parse → name / comment / email
//!     │
//!     ├──> Normalize
//!     │    ├─> name, comment: lowercase, split on non-word, drop short tokens
//!     │    └─> email: lowercase
//!     │
//!     └──> Filter short and duplicate entries
//!          └─> ["alice example", "work", "alice@example.com"]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use keyindex_keywords::{KeywordConfig, KeywordExtractor};
//!
//! let extractor = KeywordExtractor::new(KeywordConfig::default()).unwrap();
//! let keywords = extractor.extract("John W. Smoke <JOHNNYSMOKE@example.com>").unwrap();
//! assert_eq!(keywords, vec!["john smoke", "johnnysmoke@example.com"]);
//! ```

mod config;
mod error;
mod extractor;
mod normalize;
mod userid;

pub use config::{KeywordConfig, KeywordScheme, MIN_KEYWORD_LEN, MIN_TOKEN_LEN};
pub use error::{KeywordError, Result};
pub use extractor::{extract_keywords, KeywordExtractor};
pub use normalize::{normalize_segment, retokenize_keywords};
pub use userid::{clean_user_id, parse_user_id, UserIdParts};
