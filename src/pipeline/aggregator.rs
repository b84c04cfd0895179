//! Fan-out over all source adapters, classification, and hand-off to the
//! reconciler as one batch.

use crate::data::models::{ContestRecord, Platform};
use crate::data::store::Store;
use crate::pipeline::reconciler::{ReconcileSummary, reconcile};
use crate::platforms::{FetchError, SourceAdapter};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// What one source contributed to a run.
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub platform: Platform,
    pub fetched: usize,
    /// `None` on success; the failure rendered for logs otherwise.
    pub error: Option<String>,
}

/// Per-run accounting, suitable for logging and the admin surface.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub sources: Vec<SourceOutcome>,
    pub reconcile: ReconcileSummary,
}

impl RunSummary {
    pub fn fetched(&self) -> usize {
        self.sources.iter().map(|s| s.fetched).sum()
    }

    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.error.is_some()).count()
    }
}

pub struct Aggregator {
    adapters: Vec<Box<dyn SourceAdapter>>,
    store: Arc<dyn Store>,
}

impl Aggregator {
    pub fn new(adapters: Vec<Box<dyn SourceAdapter>>, store: Arc<dyn Store>) -> Self {
        Self { adapters, store }
    }

    /// One aggregation run with `now` taken from the wall clock.
    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        self.run_at(Utc::now()).await
    }

    /// One aggregation run against an explicit `now`.
    ///
    /// All adapters execute concurrently; none blocks another beyond its own
    /// timeout, and a failure is confined to its source's summary entry. The
    /// whole batch is classified against the single `now` snapshot so one
    /// run never carries internally inconsistent statuses.
    pub async fn run_at(&self, now: DateTime<Utc>) -> anyhow::Result<RunSummary> {
        let fetches = self.adapters.iter().map(|adapter| async move {
            let platform = adapter.platform();
            (platform, adapter.fetch().await)
        });
        let results = futures::future::join_all(fetches).await;

        let mut sources = Vec::with_capacity(results.len());
        let mut batch: Vec<ContestRecord> = Vec::new();

        for (platform, result) in results {
            match result {
                Ok(drafts) => {
                    let fetched = drafts.len();
                    info!(platform = %platform, count = fetched, "source fetch succeeded");
                    for draft in drafts {
                        if draft.start_time >= draft.end_time {
                            warn!(
                                platform = %platform,
                                name = %draft.name,
                                "draft with inverted time bounds, dropping"
                            );
                            continue;
                        }
                        batch.push(draft.classify_at(now));
                    }
                    sources.push(SourceOutcome {
                        platform,
                        fetched,
                        error: None,
                    });
                }
                Err(e) => {
                    // Format errors won't self-heal on retry, so they get a
                    // louder line than plain outages.
                    match &e {
                        FetchError::Format(_) => {
                            warn!(platform = %platform, error = %e, "source schema drift")
                        }
                        FetchError::Unavailable(_) => {
                            warn!(platform = %platform, error = %e, "source unavailable")
                        }
                    }
                    sources.push(SourceOutcome {
                        platform,
                        fetched: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let summary = reconcile(self.store.as_ref(), &batch).await?;

        info!(
            fetched = batch.len(),
            inserted = summary.inserted,
            updated = summary.updated,
            failed_records = summary.failed,
            failed_sources = sources.iter().filter(|s| s.error.is_some()).count(),
            "aggregation run complete"
        );

        Ok(RunSummary {
            sources,
            reconcile: summary,
        })
    }
}
