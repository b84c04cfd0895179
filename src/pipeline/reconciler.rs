//! Batch reconciliation against the store.
//!
//! One upsert per record, keyed by the natural key. A single record's
//! failure is counted and the batch continues; only losing the store
//! itself aborts the run.

use crate::data::models::ContestRecord;
use crate::data::store::{Store, StoreError, UpsertOutcome};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub inserted: usize,
    pub updated: usize,
    pub failed: usize,
}

impl ReconcileSummary {
    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Upsert every record in the batch. Replaying an identical batch converges
/// to the same stored state: the upsert key is `(name, platform)` and the
/// mutable fields are overwritten from the batch, never merged.
pub async fn reconcile(
    store: &dyn Store,
    batch: &[ContestRecord],
) -> Result<ReconcileSummary, StoreError> {
    let mut summary = ReconcileSummary::default();

    for record in batch {
        match store.upsert_contest(record).await {
            Ok(UpsertOutcome::Inserted) => summary.inserted += 1,
            Ok(UpsertOutcome::Updated) => summary.updated += 1,
            Err(e) if e.is_unavailable() => return Err(e),
            Err(e) => {
                warn!(
                    name = %record.name,
                    platform = %record.platform,
                    error = %e,
                    "contest upsert failed, continuing batch"
                );
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryStore;
    use crate::data::models::{ContestStatus, Platform};
    use chrono::{TimeZone, Utc};

    fn record(name: &str) -> ContestRecord {
        ContestRecord {
            name: name.to_owned(),
            platform: Platform::Codeforces,
            start_time: Utc.with_ymd_and_hms(2026, 4, 1, 10, 0, 0).single().unwrap(),
            end_time: Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).single().unwrap(),
            url: format!("https://codeforces.com/contest/{name}"),
            status: ContestStatus::Upcoming,
        }
    }

    #[tokio::test]
    async fn replaying_a_batch_converges() {
        let store = MemoryStore::new();
        let batch = vec![record("Round 901"), record("Round 902")];

        let first = reconcile(&store, &batch).await.unwrap();
        assert_eq!(first.inserted, 2);
        assert_eq!(first.updated, 0);

        let second = reconcile(&store, &batch).await.unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.updated, 2);
        assert_eq!(second.failed, 0);

        let stored = store
            .find_contests(&Default::default())
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
    }
}
