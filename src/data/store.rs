//! The abstract keyed upsert store the pipeline writes into.
//!
//! Everything downstream of the aggregator coordinates through this trait:
//! the reconciler and linker write, the web read path and scheduler read.
//! `PgStore` is the production implementation; `MemoryStore` backs the test
//! suite so pipeline properties can be exercised without a database.

use crate::data::models::{Contest, ContestRecord, ContestStatus, Platform, SolutionLink};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage failure. Per-record failures are tolerated by the reconciler;
/// connection-level loss aborts the in-flight run.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether this error means the store itself is gone (fatal to the run)
    /// rather than a single statement failing.
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::Unavailable(_) => true,
            StoreError::Database(e) => matches!(
                e,
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
            ),
        }
    }
}

/// Result of a contest upsert against the natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Read-path filter over stored contests.
#[derive(Debug, Clone, Default)]
pub struct ContestFilter {
    /// Empty means all platforms.
    pub platforms: Vec<Platform>,
    /// Applied against the *stored* status column; the web layer prefers
    /// recomputing from time bounds and filters after the fact instead.
    pub status: Option<ContestStatus>,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Insert-or-update keyed by `(name, platform)`. On update the mutable
    /// fields (`start_time`, `end_time`, `url`, `status`) are overwritten;
    /// upstream is the source of truth for them.
    async fn upsert_contest(&self, record: &ContestRecord) -> Result<UpsertOutcome, StoreError>;

    /// Contests matching the filter, ordered by `start_time` ascending.
    async fn find_contests(&self, filter: &ContestFilter) -> Result<Vec<Contest>, StoreError>;

    async fn find_contest_by_id(&self, id: i64) -> Result<Option<Contest>, StoreError>;

    /// Case-insensitive substring match on `name` within one platform.
    /// Used by the solution linker to resolve extracted identifiers.
    async fn search_contests(
        &self,
        platform: Platform,
        fragment: &str,
    ) -> Result<Vec<Contest>, StoreError>;

    /// Attach a solution link unless one already exists; returns the
    /// surviving row either way. The pipeline is additive-only here.
    async fn upsert_solution_link(
        &self,
        contest_id: i64,
        url: &str,
        added_manually: bool,
    ) -> Result<SolutionLink, StoreError>;

    async fn find_solution_link(&self, contest_id: i64)
    -> Result<Option<SolutionLink>, StoreError>;

    /// Persisted scheduler timestamp, or `None` if absent or unparseable.
    async fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError>;

    async fn set_timestamp(&self, key: &str, ts: DateTime<Utc>) -> Result<(), StoreError>;
}
