//! Per-provider source adapters.
//!
//! Each adapter fetches one upstream's native contest listing and maps it
//! into [`ContestDraft`]s. The mapping lives in a pure `parse_*` function so
//! the provider's time/duration encoding (epoch seconds, ISO-8601, relative
//! durations) is unit-testable without network access. Failure isolation is
//! the adapter boundary's contract: an adapter fails alone, with a typed
//! error, and never takes another source down with it.

pub mod codechef;
pub mod codeforces;
pub mod leetcode;

use crate::data::models::{ContestDraft, Platform};
use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;

pub use codechef::CodeChefAdapter;
pub use codeforces::CodeforcesAdapter;
pub use leetcode::LeetCodeAdapter;

/// Per-request timeout so a hung upstream cannot stall a whole run.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Why a single source produced nothing this run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure: connect, timeout, non-2xx. Transient; the
    /// next scheduled run retries.
    #[error("upstream unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
    /// The response body did not match the provider's expected schema.
    /// Surfaced distinctly because it will not self-heal on retry.
    #[error("unexpected response shape: {0}")]
    Format(#[source] anyhow::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Unavailable(e.into())
    }
}

impl FetchError {
    pub(crate) fn format(e: impl Into<anyhow::Error>) -> Self {
        FetchError::Format(e.into())
    }
}

/// A single upstream provider's fetch-and-normalize step.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// Fetch the provider's listing and map it to canonical drafts:
    /// not yet status-classified, not yet persisted.
    async fn fetch(&self) -> Result<Vec<ContestDraft>, FetchError>;
}

/// Shared HTTP client for adapters: bounded timeout, identifying UA.
pub(crate) fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build adapter http client")
}

/// The three production adapters, one per supported platform.
pub fn default_adapters() -> anyhow::Result<Vec<Box<dyn SourceAdapter>>> {
    Ok(vec![
        Box::new(CodeforcesAdapter::new()?),
        Box::new(CodeChefAdapter::new()?),
        Box::new(LeetCodeAdapter::new()?),
    ])
}
