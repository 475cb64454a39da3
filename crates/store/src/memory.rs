use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::store::{validate_fingerprint, KeyStore};
use crate::types::KeyRecord;

/// In-process store. Documents are kept as raw JSON so malformed records can
/// be seeded the same way they would appear in a real database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<BTreeMap<String, Value>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: &KeyRecord) -> Result<()> {
        validate_fingerprint(&record.fingerprint)?;
        let doc = serde_json::to_value(record)?;
        self.docs
            .write()
            .await
            .insert(record.fingerprint.clone(), doc);
        Ok(())
    }

    /// Seed a document without going through [`KeyRecord`]
    pub async fn insert_raw(&self, fingerprint: impl Into<String>, doc: Value) {
        self.docs.write().await.insert(fingerprint.into(), doc);
    }

    pub async fn get_raw(&self, fingerprint: &str) -> Option<Value> {
        self.docs.read().await.get(fingerprint).cloned()
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    /// Number of successful `save` calls so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl KeyStore for MemoryStore {
    async fn fingerprints(&self) -> Result<Vec<String>> {
        Ok(self.docs.read().await.keys().cloned().collect())
    }

    async fn load(&self, fingerprint: &str) -> Result<KeyRecord> {
        let doc = self
            .docs
            .read()
            .await
            .get(fingerprint)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(fingerprint.to_string()))?;
        serde_json::from_value(doc).map_err(|e| StoreError::invalid_record(fingerprint, e))
    }

    async fn save(&self, record: &KeyRecord) -> Result<()> {
        self.insert(record).await?;
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Identity;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn save_then_load() {
        let store = MemoryStore::new();
        let record = KeyRecord::new("AA11", vec![Identity::new("Alice <alice@example.com>")]);
        store.save(&record).await.unwrap();

        assert_eq!(store.load("AA11").await.unwrap(), record);
        assert_eq!(store.fingerprints().await.unwrap(), vec!["AA11"]);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn malformed_document_is_per_record_error() {
        let store = MemoryStore::new();
        store.insert_raw("BB22", json!({"fingerprint": "BB22"})).await;

        let err = store.load("BB22").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }), "{err}");
        assert!(matches!(
            store.load("missing").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }
}
