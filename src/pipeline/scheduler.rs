//! Periodic triggers for the aggregation and linking pipelines.
//!
//! One loop, two independent cadences. Each trigger spawns its run in its
//! own task and keeps the `JoinHandle` around: a cycle whose previous run
//! is still in flight is skipped and logged, never doubled, so two
//! aggregator runs can never write the same keys concurrently. A slow
//! aggregator run does not delay the linker's schedule or vice versa.
//! Last-success timestamps are persisted through the store so restarts
//! honor the remaining cooldown instead of refetching immediately.

use crate::data::store::Store;
use crate::pipeline::aggregator::Aggregator;
use crate::pipeline::linker::SolutionLinker;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, info, warn};

/// How often the loop re-evaluates both cadences.
const TICK_INTERVAL: Duration = Duration::from_secs(60);

// app_kv keys for persisting trigger timestamps across restarts.
pub const KV_CONTEST_FETCH: &str = "scheduler.contest_fetch";
pub const KV_SOLUTION_SYNC: &str = "scheduler.solution_sync";

/// Whether a trigger is due, given its persisted last success.
fn is_due(last: Option<DateTime<Utc>>, interval: Duration, now: DateTime<Utc>) -> bool {
    match last {
        None => true,
        Some(ts) => {
            let elapsed = (now - ts).to_std().unwrap_or(interval);
            elapsed >= interval
        }
    }
}

pub struct Scheduler {
    store: Arc<dyn Store>,
    aggregator: Arc<Aggregator>,
    /// Absent when no video channel is configured; only the contest
    /// pipeline runs then.
    linker: Option<Arc<SolutionLinker>>,
    fetch_interval: Duration,
    link_interval: Duration,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn Store>,
        aggregator: Arc<Aggregator>,
        linker: Option<Arc<SolutionLinker>>,
        fetch_interval: Duration,
        link_interval: Duration,
    ) -> Self {
        Self {
            store,
            aggregator,
            linker,
            fetch_interval,
            link_interval,
        }
    }

    /// Main loop. Runs are fire-and-forget relative to each other and are
    /// not cancelled mid-flight on shutdown: the loop drains them before
    /// returning, and the service manager bounds how long that drain may
    /// take.
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(
            fetch_interval_secs = self.fetch_interval.as_secs(),
            link_interval_secs = self.link_interval.as_secs(),
            linker_enabled = self.linker.is_some(),
            "scheduler started"
        );

        let mut last_fetch = self.load_timestamp(KV_CONTEST_FETCH).await;
        let mut last_link = self.load_timestamp(KV_SOLUTION_SYNC).await;
        if last_fetch.is_some() || last_link.is_some() {
            info!(?last_fetch, ?last_link, "loaded persisted trigger timestamps");
        }

        let mut fetch_work: Option<JoinHandle<()>> = None;
        let mut link_work: Option<JoinHandle<()>> = None;

        loop {
            let now = Utc::now();

            if is_due(last_fetch, self.fetch_interval, now) {
                if fetch_work.as_ref().is_some_and(|h| !h.is_finished()) {
                    info!("aggregation run still in flight, skipping this cycle");
                } else {
                    last_fetch = Some(now);
                    fetch_work = Some(self.spawn_fetch_run());
                }
            }

            if let Some(linker) = &self.linker
                && is_due(last_link, self.link_interval, now)
            {
                if link_work.as_ref().is_some_and(|h| !h.is_finished()) {
                    info!("solution link run still in flight, skipping this cycle");
                } else {
                    last_link = Some(now);
                    link_work = Some(self.spawn_link_run(linker.clone()));
                }
            }

            tokio::select! {
                _ = time::sleep(TICK_INTERVAL) => {}
                _ = shutdown_rx.recv() => {
                    info!("scheduler received shutdown signal, exiting");
                    break;
                }
            }
        }

        for (name, work) in [("aggregation", fetch_work), ("solution link", link_work)] {
            let Some(handle) = work else { continue };
            if !handle.is_finished() {
                info!(run = name, "waiting for in-flight run to finish");
            }
            if let Err(e) = handle.await {
                error!(run = name, error = %e, "in-flight run task failed");
            }
        }
    }

    async fn load_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.store.get_timestamp(key).await {
            Ok(ts) => ts,
            Err(e) => {
                warn!(key, error = %e, "failed to load persisted timestamp");
                None
            }
        }
    }

    fn spawn_fetch_run(&self) -> JoinHandle<()> {
        let aggregator = self.aggregator.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            match aggregator.run().await {
                Ok(summary) => {
                    debug!(
                        fetched = summary.fetched(),
                        written = summary.reconcile.written(),
                        "scheduled aggregation run finished"
                    );
                    if let Err(e) = store.set_timestamp(KV_CONTEST_FETCH, Utc::now()).await {
                        warn!(error = %e, "failed to persist contest fetch timestamp");
                    }
                }
                // Caught here so a failed run never unschedules the next one.
                Err(e) => error!(error = %e, "scheduled aggregation run failed"),
            }
        })
    }

    fn spawn_link_run(&self, linker: Arc<SolutionLinker>) -> JoinHandle<()> {
        let store = self.store.clone();
        tokio::spawn(async move {
            match linker.run().await {
                Ok(summary) => {
                    debug!(linked = summary.linked, "scheduled link run finished");
                    if let Err(e) = store.set_timestamp(KV_SOLUTION_SYNC, Utc::now()).await {
                        warn!(error = %e, "failed to persist solution sync timestamp");
                    }
                }
                Err(e) => error!(error = %e, "scheduled solution link run failed"),
            }
        })
    }
}
