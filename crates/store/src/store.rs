use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::types::KeyRecord;

/// Document store holding key records by fingerprint.
///
/// Implementations are shared across re-index workers, so every method takes
/// `&self`.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// All fingerprints in the store, in a stable order
    async fn fingerprints(&self) -> Result<Vec<String>>;

    /// Load one record. Unparseable documents yield [`StoreError::InvalidRecord`].
    async fn load(&self, fingerprint: &str) -> Result<KeyRecord>;

    /// Replace the stored document for `record.fingerprint`
    async fn save(&self, record: &KeyRecord) -> Result<()>;
}

/// Fingerprints double as document names, so anything that could escape the
/// store directory is refused.
pub fn validate_fingerprint(fingerprint: &str) -> Result<()> {
    let ok = !fingerprint.is_empty()
        && !fingerprint.starts_with('.')
        && fingerprint
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidFingerprint(fingerprint.to_string()))
    }
}
