use serde::{Deserialize, Serialize};

use crate::outcome::RecordOutcome;

/// A key that was left untouched, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordError {
    pub fingerprint: String,
    pub reason: String,
}

/// Statistics about a re-index run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReindexStats {
    /// Number of keys visited
    pub records: usize,

    /// Keys whose keywords changed
    pub updated: usize,

    /// Keys whose keywords were already current
    pub unchanged: usize,

    /// Keys skipped because of an error
    pub skipped: usize,

    /// Identities re-keyed on non-skipped keys
    pub identities: usize,

    /// Keywords now stored on non-skipped keys
    pub keywords: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Skipped keys, in fingerprint order
    pub errors: Vec<RecordError>,
}

impl ReindexStats {
    pub fn new() -> Self {
        Self {
            records: 0,
            updated: 0,
            unchanged: 0,
            skipped: 0,
            identities: 0,
            keywords: 0,
            time_ms: 0,
            errors: Vec::new(),
        }
    }

    pub fn add_outcome(&mut self, outcome: &RecordOutcome) {
        self.records += 1;
        match outcome {
            RecordOutcome::Updated {
                identities,
                keywords,
                ..
            } => {
                self.updated += 1;
                self.identities += identities;
                self.keywords += keywords;
            }
            RecordOutcome::Unchanged {
                identities,
                keywords,
                ..
            } => {
                self.unchanged += 1;
                self.identities += identities;
                self.keywords += keywords;
            }
            RecordOutcome::Skipped {
                fingerprint,
                reason,
            } => {
                self.skipped += 1;
                self.errors.push(RecordError {
                    fingerprint: fingerprint.clone(),
                    reason: reason.clone(),
                });
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.skipped == 0
    }
}

impl Default for ReindexStats {
    fn default() -> Self {
        Self::new()
    }
}
