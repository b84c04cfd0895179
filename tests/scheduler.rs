//! Scheduler lifecycle against the in-memory store.

mod helpers;

use async_trait::async_trait;
use chrono::Utc;
use helpers::make_draft;
use podium::data::models::{ContestDraft, Platform};
use podium::data::store::ContestFilter;
use podium::data::{MemoryStore, Store};
use podium::pipeline::scheduler::KV_CONTEST_FETCH;
use podium::pipeline::{Aggregator, Scheduler};
use podium::platforms::{FetchError, SourceAdapter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Adapter whose fetch outlives the shutdown signal.
struct SlowAdapter;

#[async_trait]
impl SourceAdapter for SlowAdapter {
    fn platform(&self) -> Platform {
        Platform::Codeforces
    }

    async fn fetch(&self) -> Result<Vec<ContestDraft>, FetchError> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(vec![make_draft(
            "Codeforces Round 910",
            Platform::Codeforces,
            Utc::now(),
            4,
        )])
    }
}

#[tokio::test]
async fn shutdown_drains_the_in_flight_run() {
    let store = Arc::new(MemoryStore::new());
    let aggregator = Arc::new(Aggregator::new(
        vec![Box::new(SlowAdapter)],
        store.clone() as Arc<dyn Store>,
    ));
    let scheduler = Scheduler::new(
        store.clone() as Arc<dyn Store>,
        aggregator,
        None,
        Duration::from_secs(3600),
        Duration::from_secs(3600),
    );

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let run = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    // The first tick starts the run immediately; signal shutdown while the
    // fetch is still sleeping.
    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.send(()).unwrap();
    run.await.unwrap();

    // run() returned only after the in-flight run finished writing.
    let all = store.find_contests(&ContestFilter::default()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(
        store.get_timestamp(KV_CONTEST_FETCH).await.unwrap().is_some(),
        "completed run persists its timestamp"
    );
}
