//! CodeChef contest listing adapter.
//!
//! `GET https://www.codechef.com/api/list/contests/all` returns future,
//! present, and past contest windows with ISO-8601 start/end dates.

use crate::data::models::{ContestDraft, Platform};
use crate::platforms::{FetchError, SourceAdapter, http_client};
use anyhow::Context;
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::warn;
use url::Url;

const CONTEST_LIST_URL: &str = "https://www.codechef.com/api/list/contests/all";

#[derive(Debug, Deserialize)]
struct Listing {
    /// Required: its absence means the schema drifted, not an empty window.
    future_contests: Vec<RawContest>,
    #[serde(default)]
    present_contests: Vec<RawContest>,
    #[serde(default)]
    past_contests: Vec<RawContest>,
}

#[derive(Debug, Deserialize)]
struct RawContest {
    contest_code: String,
    contest_name: String,
    contest_start_date_iso: String,
    contest_end_date_iso: String,
}

pub struct CodeChefAdapter {
    url: Url,
    client: reqwest::Client,
}

impl CodeChefAdapter {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            url: Url::parse(CONTEST_LIST_URL)?,
            client: http_client()?,
        })
    }
}

#[async_trait]
impl SourceAdapter for CodeChefAdapter {
    fn platform(&self) -> Platform {
        Platform::CodeChef
    }

    async fn fetch(&self) -> Result<Vec<ContestDraft>, FetchError> {
        let body = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_contest_list(&body)
    }
}

/// Map all three windows into canonical drafts. ISO timestamps that fail to
/// parse fail the whole response closed; inverted bounds are skipped.
pub fn parse_contest_list(body: &str) -> Result<Vec<ContestDraft>, FetchError> {
    let listing: Listing = serde_json::from_str(body).map_err(FetchError::format)?;

    let mut drafts = Vec::new();
    for raw in listing
        .future_contests
        .into_iter()
        .chain(listing.present_contests)
        .chain(listing.past_contests)
    {
        let start_time = DateTime::parse_from_rfc3339(&raw.contest_start_date_iso)
            .with_context(|| format!("bad start date for {}", raw.contest_code))
            .map_err(FetchError::format)?
            .to_utc();
        let end_time = DateTime::parse_from_rfc3339(&raw.contest_end_date_iso)
            .with_context(|| format!("bad end date for {}", raw.contest_code))
            .map_err(FetchError::format)?
            .to_utc();
        if start_time >= end_time {
            warn!(code = %raw.contest_code, "inverted contest bounds, skipping");
            continue;
        }

        drafts.push(ContestDraft {
            name: raw.contest_name,
            platform: Platform::CodeChef,
            start_time,
            end_time,
            url: format!("https://www.codechef.com/{}", raw.contest_code),
        });
    }

    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "status": "success",
        "future_contests": [
            {
                "contest_code": "START120",
                "contest_name": "Starters 120",
                "contest_start_date": "14 Jan 2026  20:00:00",
                "contest_end_date": "14 Jan 2026  22:00:00",
                "contest_start_date_iso": "2026-01-14T20:00:00+05:30",
                "contest_end_date_iso": "2026-01-14T22:00:00+05:30",
                "contest_duration": "120"
            }
        ],
        "present_contests": [],
        "past_contests": [
            {
                "contest_code": "COOK155",
                "contest_name": "CodeChef Cook-Off 155",
                "contest_start_date_iso": "2025-12-01T21:30:00+05:30",
                "contest_end_date_iso": "2025-12-02T00:00:00+05:30"
            }
        ]
    }"#;

    #[test]
    fn maps_iso_dates_and_offsets_to_utc() {
        let drafts = parse_contest_list(FIXTURE).unwrap();
        assert_eq!(drafts.len(), 2);

        let starters = &drafts[0];
        assert_eq!(starters.name, "Starters 120");
        assert_eq!(starters.platform, Platform::CodeChef);
        // +05:30 offset folded into UTC.
        assert_eq!(starters.start_time.to_rfc3339(), "2026-01-14T14:30:00+00:00");
        assert_eq!(starters.end_time.to_rfc3339(), "2026-01-14T16:30:00+00:00");
        assert_eq!(starters.url, "https://www.codechef.com/START120");
    }

    #[test]
    fn past_and_present_windows_are_included() {
        let drafts = parse_contest_list(FIXTURE).unwrap();
        assert!(drafts.iter().any(|d| d.name == "CodeChef Cook-Off 155"));
    }

    #[test]
    fn missing_future_window_is_a_format_error() {
        let err = parse_contest_list(r#"{"status": "success"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Format(_)));
    }

    #[test]
    fn unparseable_date_is_a_format_error() {
        let body = r#"{"future_contests": [{
            "contest_code": "X",
            "contest_name": "X",
            "contest_start_date_iso": "14 Jan 2026 20:00:00",
            "contest_end_date_iso": "2026-01-14T22:00:00+05:30"
        }]}"#;
        let err = parse_contest_list(body).unwrap_err();
        assert!(matches!(err, FetchError::Format(_)));
    }
}
