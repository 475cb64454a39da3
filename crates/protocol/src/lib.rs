use anyhow::Result;
use keyindex_indexer::{ReindexOptions, ReindexStats};
use serde::{Deserialize, Serialize};

pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Keywords derived for one identity, or why none could be derived
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ExtractOutput {
    pub identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
}

impl ExtractOutput {
    pub fn ok(identity: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            identity: identity.into(),
            keywords: Some(keywords),
            error: None,
        }
    }

    pub fn failed(identity: impl Into<String>, error: ErrorEnvelope) -> Self {
        Self {
            identity: identity.into(),
            keywords: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReindexReport {
    pub schema_version: u32,
    pub store: String,
    pub scheme: String,
    pub options: ReindexOptions,
    pub stats: ReindexStats,
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
