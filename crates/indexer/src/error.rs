use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Store error: {0}")]
    StoreError(#[from] keyindex_store::StoreError),

    #[error("Keyword error: {0}")]
    KeywordError(#[from] keyindex_keywords::KeywordError),

    #[error("Re-index worker failed: {0}")]
    WorkerError(String),
}
