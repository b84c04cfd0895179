//! In-process [`Store`] implementation.
//!
//! Mirrors the Postgres semantics closely enough for the pipeline's
//! integration tests to run without a database: natural-key upserts,
//! additive-only solution links, substring contest search.

use crate::data::models::{Contest, ContestRecord, Platform, SolutionLink};
use crate::data::store::{ContestFilter, Store, StoreError, UpsertOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    contests: Vec<Contest>,
    solutions: HashMap<i64, SolutionLink>,
    timestamps: HashMap<String, DateTime<Utc>>,
    next_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_contest(&self, record: &ContestRecord) -> Result<UpsertOutcome, StoreError> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner
            .contests
            .iter_mut()
            .find(|c| c.name == record.name && c.platform == record.platform)
        {
            existing.start_time = record.start_time;
            existing.end_time = record.end_time;
            existing.url = record.url.clone();
            existing.status = record.status;
            return Ok(UpsertOutcome::Updated);
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.contests.push(Contest {
            id,
            name: record.name.clone(),
            platform: record.platform,
            start_time: record.start_time,
            end_time: record.end_time,
            url: record.url.clone(),
            status: record.status,
        });
        Ok(UpsertOutcome::Inserted)
    }

    async fn find_contests(&self, filter: &ContestFilter) -> Result<Vec<Contest>, StoreError> {
        let inner = self.inner.read().await;
        let mut matched: Vec<Contest> = inner
            .contests
            .iter()
            .filter(|c| filter.platforms.is_empty() || filter.platforms.contains(&c.platform))
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .cloned()
            .collect();
        matched.sort_by_key(|c| c.start_time);
        Ok(matched)
    }

    async fn find_contest_by_id(&self, id: i64) -> Result<Option<Contest>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.contests.iter().find(|c| c.id == id).cloned())
    }

    async fn search_contests(
        &self,
        platform: Platform,
        fragment: &str,
    ) -> Result<Vec<Contest>, StoreError> {
        let needle = fragment.to_lowercase();
        let inner = self.inner.read().await;
        let mut matched: Vec<Contest> = inner
            .contests
            .iter()
            .filter(|c| c.platform == platform && c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matched.sort_by_key(|c| c.start_time);
        Ok(matched)
    }

    async fn upsert_solution_link(
        &self,
        contest_id: i64,
        url: &str,
        added_manually: bool,
    ) -> Result<SolutionLink, StoreError> {
        let mut inner = self.inner.write().await;
        let link = inner
            .solutions
            .entry(contest_id)
            .or_insert_with(|| SolutionLink {
                contest_id,
                url: url.to_owned(),
                added_manually,
            });
        Ok(link.clone())
    }

    async fn find_solution_link(
        &self,
        contest_id: i64,
    ) -> Result<Option<SolutionLink>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.solutions.get(&contest_id).cloned())
    }

    async fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.timestamps.get(key).copied())
    }

    async fn set_timestamp(&self, key: &str, ts: DateTime<Utc>) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.timestamps.insert(key.to_owned(), ts);
        Ok(())
    }
}
