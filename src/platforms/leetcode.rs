//! LeetCode contest listing adapter.
//!
//! LeetCode has no REST listing; the public GraphQL endpoint exposes
//! `allContests` with epoch-second start times and relative durations.

use crate::data::models::{ContestDraft, Platform};
use crate::platforms::{FetchError, SourceAdapter, http_client};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use url::Url;

const GRAPHQL_URL: &str = "https://leetcode.com/graphql";

const CONTESTS_QUERY: &str = "query { allContests { title titleSlug startTime duration } }";

#[derive(Debug, Deserialize)]
struct Envelope {
    /// `null` when the query fails server-side.
    data: Option<Data>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Data {
    all_contests: Option<Vec<RawContest>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContest {
    title: String,
    title_slug: String,
    start_time: i64,
    duration: i64,
}

pub struct LeetCodeAdapter {
    url: Url,
    client: reqwest::Client,
}

impl LeetCodeAdapter {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            url: Url::parse(GRAPHQL_URL)?,
            client: http_client()?,
        })
    }
}

#[async_trait]
impl SourceAdapter for LeetCodeAdapter {
    fn platform(&self) -> Platform {
        Platform::LeetCode
    }

    async fn fetch(&self) -> Result<Vec<ContestDraft>, FetchError> {
        let body = self
            .client
            .post(self.url.clone())
            .json(&json!({ "query": CONTESTS_QUERY }))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_contest_list(&body)
    }
}

/// Map the GraphQL payload into canonical drafts. A missing `data` or
/// `allContests` field fails closed.
pub fn parse_contest_list(body: &str) -> Result<Vec<ContestDraft>, FetchError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(FetchError::format)?;
    let contests = envelope
        .data
        .and_then(|d| d.all_contests)
        .ok_or_else(|| FetchError::format(anyhow!("graphql response without allContests")))?;

    let mut drafts = Vec::with_capacity(contests.len());
    for raw in contests {
        let Some(start_time) = DateTime::<Utc>::from_timestamp(raw.start_time, 0) else {
            warn!(slug = %raw.title_slug, start = raw.start_time, "start time out of range, skipping");
            continue;
        };
        if raw.duration <= 0 {
            warn!(slug = %raw.title_slug, duration = raw.duration, "non-positive duration, skipping");
            continue;
        }
        // try_seconds + checked add: an absurd duration must not panic the run.
        let Some(end_time) = Duration::try_seconds(raw.duration)
            .and_then(|d| start_time.checked_add_signed(d))
        else {
            warn!(slug = %raw.title_slug, duration = raw.duration, "duration out of range, skipping");
            continue;
        };

        drafts.push(ContestDraft {
            name: raw.title,
            platform: Platform::LeetCode,
            start_time,
            end_time,
            url: format!("https://leetcode.com/contest/{}", raw.title_slug),
        });
    }

    Ok(drafts)
}
