//! Codeforces contest listing adapter.
//!
//! `GET https://codeforces.com/api/contest.list` returns an envelope with a
//! `status` field and epoch-second start/duration pairs.

use crate::data::models::{ContestDraft, Platform};
use crate::platforms::{FetchError, SourceAdapter, http_client};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::warn;
use url::Url;

const CONTEST_LIST_URL: &str = "https://codeforces.com/api/contest.list";

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    result: Vec<RawContest>,
    comment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContest {
    id: i64,
    name: String,
    duration_seconds: i64,
    /// Absent for contests that are announced but not yet scheduled.
    start_time_seconds: Option<i64>,
}

pub struct CodeforcesAdapter {
    url: Url,
    client: reqwest::Client,
}

impl CodeforcesAdapter {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            url: Url::parse(CONTEST_LIST_URL)?,
            client: http_client()?,
        })
    }
}

#[async_trait]
impl SourceAdapter for CodeforcesAdapter {
    fn platform(&self) -> Platform {
        Platform::Codeforces
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

/// Map the raw envelope into canonical drafts. Fails closed on a non-OK
/// envelope or a body that does not deserialize; unscheduled entries and
/// non-positive durations are skipped.
pub fn parse_contest_list(body: &str) -> Result<Vec<ContestDraft>, FetchError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(FetchError::format)?;

    if envelope.status != "OK" {
        return Err(FetchError::format(anyhow!(
            "codeforces api status {:?}: {}",
            envelope.status,
            envelope.comment.as_deref().unwrap_or("no comment")
        )));
    }

    let mut drafts = Vec::with_capacity(envelope.result.len());
    for raw in envelope.result {
        let Some(start_secs) = raw.start_time_seconds else {
            continue; // announced but unscheduled
        };
        let Some(start_time) = DateTime::<Utc>::from_timestamp(start_secs, 0) else {
            warn!(contest_id = raw.id, start_secs, "start time out of range, skipping");
            continue;
        };
        if raw.duration_seconds <= 0 {
            warn!(contest_id = raw.id, duration = raw.duration_seconds, "non-positive duration, skipping");
            continue;
        }
        // try_seconds + checked add: an absurd duration must not panic the run.
        let Some(end_time) = Duration::try_seconds(raw.duration_seconds)
            .and_then(|d| start_time.checked_add_signed(d))
        else {
            warn!(contest_id = raw.id, duration = raw.duration_seconds, "duration out of range, skipping");
            continue;
        };

        drafts.push(ContestDraft {
            name: raw.name,
            platform: Platform::Codeforces,
            start_time,
            end_time,
            url: format!("https://codeforces.com/contest/{}", raw.id),
        });
    }

    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "status": "OK",
        "result": [
            {
                "id": 1900,
                "name": "Codeforces Round 900 (Div. 2)",
                "type": "CF",
                "phase": "BEFORE",
                "frozen": false,
                "durationSeconds": 7200,
                "startTimeSeconds": 1767261600,
                "relativeTimeSeconds": -86400
            },
            {
                "id": 1901,
                "name": "Unscheduled Round",
                "type": "CF",
                "phase": "BEFORE",
                "frozen": false,
                "durationSeconds": 7200
            }
        ]
    }"#;

    #[test]
    fn maps_epoch_seconds_into_absolute_bounds() {
        let drafts = parse_contest_list(FIXTURE).unwrap();
        assert_eq!(drafts.len(), 1);

        let draft = &drafts[0];
        assert_eq!(draft.name, "Codeforces Round 900 (Div. 2)");
        assert_eq!(draft.platform, Platform::Codeforces);
        assert_eq!(draft.start_time.timestamp(), 1767261600);
        assert_eq!(draft.end_time.timestamp(), 1767261600 + 7200);
        assert_eq!(draft.url, "https://codeforces.com/contest/1900");
    }

    #[test]
    fn non_ok_envelope_is_a_format_error() {
        let body = r#"{"status": "FAILED", "comment": "contest.list: rate limit"}"#;
        let err = parse_contest_list(body).unwrap_err();
        assert!(matches!(err, FetchError::Format(_)));
    }

    #[test]
    fn malformed_body_is_a_format_error() {
        let err = parse_contest_list("<html>Service Unavailable</html>").unwrap_err();
        assert!(matches!(err, FetchError::Format(_)));
    }

    #[test]
    fn unscheduled_entries_are_skipped_not_fatal() {
        let body = r#"{"status": "OK", "result": [
            {"id": 1, "name": "No Start", "durationSeconds": 3600}
        ]}"#;
        assert!(parse_contest_list(body).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_duration_is_skipped_not_fatal() {
        let body = r#"{"status": "OK", "result": [
            {"id": 1, "name": "Huge", "durationSeconds": 9223372036854775807, "startTimeSeconds": 1767261600},
            {"id": 2, "name": "Fine", "durationSeconds": 7200, "startTimeSeconds": 1767261600}
        ]}"#;
        let drafts = parse_contest_list(body).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "Fine");
    }
}
