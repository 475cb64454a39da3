use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::store::{validate_fingerprint, KeyStore};
use crate::types::KeyRecord;

const RECORD_EXTENSION: &str = "json";

/// A directory of `<fingerprint>.json` documents.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open an existing store directory
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(StoreError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Open a store directory, creating it if needed
    pub async fn create(root: impl AsRef<Path>) -> Result<Self> {
        tokio::fs::create_dir_all(root.as_ref()).await?;
        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, fingerprint: &str) -> Result<PathBuf> {
        validate_fingerprint(fingerprint)?;
        Ok(self
            .root
            .join(format!("{fingerprint}.{RECORD_EXTENSION}")))
    }
}

#[async_trait]
impl KeyStore for DirStore {
    async fn fingerprints(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut out = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) if validate_fingerprint(stem).is_ok() => out.push(stem.to_string()),
                _ => log::debug!("Ignoring store entry {}", path.display()),
            }
        }
        out.sort();
        Ok(out)
    }

    async fn load(&self, fingerprint: &str) -> Result<KeyRecord> {
        let path = self.record_path(fingerprint)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(fingerprint.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let record: KeyRecord = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::invalid_record(fingerprint, e))?;
        if record.fingerprint != fingerprint {
            return Err(StoreError::invalid_record(
                fingerprint,
                format!("document claims fingerprint {}", record.fingerprint),
            ));
        }
        Ok(record)
    }

    async fn save(&self, record: &KeyRecord) -> Result<()> {
        let path = self.record_path(&record.fingerprint)?;
        let bytes = serde_json::to_vec_pretty(record)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Identity;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn lists_only_record_documents() {
        let temp = TempDir::new().expect("tempdir");
        let store = DirStore::open(temp.path()).unwrap();
        store
            .save(&KeyRecord::new("BB", vec![Identity::new("Bob")]))
            .await
            .unwrap();
        store
            .save(&KeyRecord::new("AA", vec![Identity::new("Alice")]))
            .await
            .unwrap();
        std::fs::write(temp.path().join("notes.txt"), "x").unwrap();
        std::fs::write(temp.path().join("CC.json.tmp"), "{}").unwrap();
        std::fs::create_dir(temp.path().join("DD.json")).unwrap();

        assert_eq!(store.fingerprints().await.unwrap(), vec!["AA", "BB"]);
    }

    #[tokio::test]
    async fn rejects_mismatched_fingerprint() {
        let temp = TempDir::new().expect("tempdir");
        let store = DirStore::open(temp.path()).unwrap();
        std::fs::write(
            temp.path().join("AA.json"),
            r#"{"fingerprint":"BB","identities":[]}"#,
        )
        .unwrap();

        let err = store.load("AA").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }), "{err}");
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let temp = TempDir::new().expect("tempdir");
        let store = DirStore::open(temp.path()).unwrap();
        // a directory in the way makes the rename fail
        std::fs::create_dir(temp.path().join("EE.json")).unwrap();
        std::fs::write(temp.path().join("EE.json").join("keep"), "x").unwrap();

        let result = store
            .save(&KeyRecord::new("EE", vec![Identity::new("Eve")]))
            .await;
        assert!(result.is_err());
        assert!(!temp.path().join("EE.json.tmp").exists());
        assert!(temp.path().join("EE.json").is_dir());
    }

    #[test]
    fn open_requires_directory() {
        let temp = TempDir::new().expect("tempdir");
        assert!(DirStore::open(temp.path().join("nope")).is_err());
    }
}
