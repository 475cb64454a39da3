use serde::{Deserialize, Serialize};

/// What happened to one key during a re-index run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Updated {
        fingerprint: String,
        identities: usize,
        keywords: usize,
    },
    Unchanged {
        fingerprint: String,
        identities: usize,
        keywords: usize,
    },
    Skipped {
        fingerprint: String,
        reason: String,
    },
}

impl RecordOutcome {
    pub fn fingerprint(&self) -> &str {
        match self {
            RecordOutcome::Updated { fingerprint, .. }
            | RecordOutcome::Unchanged { fingerprint, .. }
            | RecordOutcome::Skipped { fingerprint, .. } => fingerprint,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RecordOutcome::Skipped { .. })
    }
}
