//! # Keyindex Store
//!
//! Key records and the stores they live in. The re-indexer only sees the
//! [`KeyStore`] trait; [`DirStore`] keeps one JSON document per key on disk
//! and [`MemoryStore`] holds raw documents in memory for tests.

mod dir;
mod error;
mod memory;
mod store;
mod types;

pub use dir::DirStore;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::{validate_fingerprint, KeyStore};
pub use types::{Identity, KeyRecord};
