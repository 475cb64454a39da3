use std::sync::Arc;
use std::time::Instant;

use keyindex_keywords::KeywordExtractor;
use keyindex_store::{KeyRecord, KeyStore};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use crate::limits::{clamp_concurrency, DEFAULT_REINDEX_CONCURRENCY};
use crate::outcome::RecordOutcome;
use crate::stats::ReindexStats;
use crate::{IndexerError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReindexOptions {
    /// Compute keywords without writing anything back
    pub dry_run: bool,

    /// Number of keys processed at once
    pub concurrency: usize,

    /// Resave keys even when their keywords did not change
    pub save_unchanged: bool,
}

impl Default for ReindexOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            concurrency: DEFAULT_REINDEX_CONCURRENCY,
            save_unchanged: true,
        }
    }
}

/// Recompute the keywords of every identity on `record`.
///
/// All identities are processed before anything is written, so an error on
/// one of them leaves the whole record as it was. Returns whether any keyword
/// list changed.
pub fn rekey_record(
    extractor: &KeywordExtractor,
    record: &mut KeyRecord,
) -> keyindex_keywords::Result<bool> {
    let fresh = record
        .identities
        .iter()
        .map(|uid| extractor.keywords_for(&uid.id, &uid.keywords))
        .collect::<keyindex_keywords::Result<Vec<_>>>()?;

    let mut changed = false;
    for (uid, keywords) in record.identities.iter_mut().zip(fresh) {
        if uid.keywords != keywords {
            uid.keywords = keywords;
            changed = true;
        }
    }
    Ok(changed)
}

/// Walks every key in a store and rewrites its identity keywords.
pub struct Reindexer {
    store: Arc<dyn KeyStore>,
    extractor: Arc<KeywordExtractor>,
    options: ReindexOptions,
}

impl Reindexer {
    pub fn new(
        store: Arc<dyn KeyStore>,
        extractor: KeywordExtractor,
        options: ReindexOptions,
    ) -> Self {
        let options = ReindexOptions {
            concurrency: clamp_concurrency(options.concurrency),
            ..options
        };
        Self {
            store,
            extractor: Arc::new(extractor),
            options,
        }
    }

    pub fn options(&self) -> &ReindexOptions {
        &self.options
    }

    /// Re-index the whole store.
    ///
    /// Per-key failures are logged and counted as skipped; only a failure to
    /// list the store (or a crashed worker) aborts the run.
    pub async fn run(&self) -> Result<ReindexStats> {
        let (stats, _) = self.run_with_outcomes().await?;
        Ok(stats)
    }

    /// Like [`Reindexer::run`], also returning each key's outcome in
    /// fingerprint order.
    pub async fn run_with_outcomes(&self) -> Result<(ReindexStats, Vec<RecordOutcome>)> {
        let start = Instant::now();
        let fingerprints = self.store.fingerprints().await?;

        log::info!(
            "Re-indexing {} keys (scheme={}, concurrency={}, dry_run={})",
            fingerprints.len(),
            self.extractor.scheme(),
            self.options.concurrency,
            self.options.dry_run
        );

        let mut outcomes = if self.options.concurrency <= 1 {
            let mut outcomes = Vec::with_capacity(fingerprints.len());
            for fingerprint in fingerprints {
                outcomes.push(
                    process_record(
                        self.store.as_ref(),
                        &self.extractor,
                        &self.options,
                        fingerprint,
                    )
                    .await,
                );
            }
            outcomes
        } else {
            self.run_parallel(fingerprints).await?
        };
        outcomes.sort_by(|a, b| a.fingerprint().cmp(b.fingerprint()));

        let mut stats = ReindexStats::new();
        for outcome in &outcomes {
            stats.add_outcome(outcome);
        }
        stats.time_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "Re-indexing completed: {} keys, {} updated, {} unchanged, {} skipped in {} ms",
            stats.records,
            stats.updated,
            stats.unchanged,
            stats.skipped,
            stats.time_ms
        );
        Ok((stats, outcomes))
    }

    async fn run_parallel(&self, fingerprints: Vec<String>) -> Result<Vec<RecordOutcome>> {
        let mut outcomes = Vec::with_capacity(fingerprints.len());
        let mut pending = fingerprints.into_iter();
        let mut workers = JoinSet::new();

        loop {
            while workers.len() < self.options.concurrency {
                let Some(fingerprint) = pending.next() else {
                    break;
                };
                let store = Arc::clone(&self.store);
                let extractor = Arc::clone(&self.extractor);
                let options = self.options.clone();
                workers.spawn(async move {
                    process_record(store.as_ref(), &extractor, &options, fingerprint).await
                });
            }

            match workers.join_next().await {
                Some(joined) => {
                    outcomes.push(joined.map_err(|e| IndexerError::WorkerError(e.to_string()))?)
                }
                None => break,
            }
        }
        Ok(outcomes)
    }
}

async fn process_record(
    store: &dyn KeyStore,
    extractor: &KeywordExtractor,
    options: &ReindexOptions,
    fingerprint: String,
) -> RecordOutcome {
    match try_process_record(store, extractor, options, &fingerprint).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("Skipping key {fingerprint}: {e}");
            RecordOutcome::Skipped {
                fingerprint,
                reason: e.to_string(),
            }
        }
    }
}

async fn try_process_record(
    store: &dyn KeyStore,
    extractor: &KeywordExtractor,
    options: &ReindexOptions,
    fingerprint: &str,
) -> Result<RecordOutcome> {
    let mut record = store.load(fingerprint).await?;
    let changed = rekey_record(extractor, &mut record)?;

    for uid in &record.identities {
        log::debug!("id: {} keywords: {:?}", uid.id, uid.keywords);
    }

    if !options.dry_run && (changed || options.save_unchanged) {
        store.save(&record).await?;
    }

    let fingerprint = fingerprint.to_string();
    let identities = record.identities.len();
    let keywords = record.keyword_count();
    Ok(if changed {
        RecordOutcome::Updated {
            fingerprint,
            identities,
            keywords,
        }
    } else {
        RecordOutcome::Unchanged {
            fingerprint,
            identities,
            keywords,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyindex_keywords::{KeywordConfig, KeywordScheme};
    use keyindex_store::Identity;
    use pretty_assertions::assert_eq;

    #[test]
    fn rekey_replaces_stale_keywords() {
        let mut record = KeyRecord::new(
            "AA",
            vec![Identity::new("Alice Example (work) <alice@example.com>")
                .with_keywords(["stale", "Alice Example"])],
        );
        let changed = rekey_record(&KeywordExtractor::default(), &mut record).unwrap();
        assert!(changed);
        assert_eq!(
            record.identities[0].keywords,
            vec!["alice example", "work", "alice@example.com"]
        );

        let changed = rekey_record(&KeywordExtractor::default(), &mut record).unwrap();
        assert!(!changed);
    }

    #[test]
    fn rekey_is_all_or_nothing() {
        let original = KeyRecord::new(
            "BB",
            vec![
                Identity::new("Bob Builder <bob@example.org>").with_keywords(["old"]),
                Identity::new("Bob <bob@example.org").with_keywords(["older"]),
            ],
        );
        let mut record = original.clone();
        assert!(rekey_record(&KeywordExtractor::default(), &mut record).is_err());
        assert_eq!(record, original);
    }

    #[test]
    fn rekey_with_retokenize_scheme() {
        let extractor =
            KeywordExtractor::new(KeywordConfig::for_scheme(KeywordScheme::Retokenize)).unwrap();
        let mut record = KeyRecord::new(
            "CC",
            vec![Identity::new("whatever").with_keywords(["Carol Q <carol@example.net>"])],
        );
        assert!(rekey_record(&extractor, &mut record).unwrap());
        assert_eq!(record.identities[0].keywords, vec!["carol", "example.net"]);
    }

    #[test]
    fn options_clamp_concurrency() {
        let store: Arc<dyn KeyStore> = Arc::new(keyindex_store::MemoryStore::new());
        let reindexer = Reindexer::new(
            store,
            KeywordExtractor::default(),
            ReindexOptions {
                concurrency: 0,
                ..Default::default()
            },
        );
        assert_eq!(reindexer.options().concurrency, 1);
    }

    #[test]
    fn default_options_run_one_key_at_a_time() {
        let options = ReindexOptions::default();
        assert_eq!(options.concurrency, 1);
        assert!(!options.dry_run);
        assert!(options.save_unchanged);
    }
}
