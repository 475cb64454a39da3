//! # Keyindex Indexer
//!
//! Batch re-indexing of identity keywords.
//!
//! ## Pipeline
//!
//! ```text
//! KeyStore
//!     │
//!     ├──> List fingerprints
//!     │
//!     ├──> For each key (sequential or bounded worker window)
//!     │      ├─> load record
//!     │      ├─> recompute keywords for every identity
//!     │      └─> save (unless dry run)
//!     │
//!     └──> Outcomes (updated / unchanged / skipped)
//!            └─> ReindexStats
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use keyindex_indexer::{ReindexOptions, Reindexer};
//! use keyindex_keywords::KeywordExtractor;
//! use keyindex_store::DirStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(DirStore::open("/var/lib/keys")?);
//!     let reindexer = Reindexer::new(store, KeywordExtractor::default(), ReindexOptions::default());
//!     let stats = reindexer.run().await?;
//!
//!     println!("{} updated, {} skipped", stats.updated, stats.skipped);
//!     Ok(())
//! }
//! ```

mod error;
mod limits;
mod outcome;
mod reindexer;
mod stats;

pub use error::{IndexerError, Result};
pub use limits::{concurrency_from_env, CONCURRENCY_ENV};
pub use outcome::RecordOutcome;
pub use reindexer::{rekey_record, ReindexOptions, Reindexer};
pub use stats::{RecordError, ReindexStats};
