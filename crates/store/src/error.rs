use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record {fingerprint} is invalid: {reason}")]
    InvalidRecord { fingerprint: String, reason: String },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid fingerprint: {0:?}")]
    InvalidFingerprint(String),

    #[error("Invalid store path: {0}")]
    InvalidPath(String),
}

impl StoreError {
    pub fn invalid_record(fingerprint: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidRecord {
            fingerprint: fingerprint.into(),
            reason: reason.to_string(),
        }
    }
}
