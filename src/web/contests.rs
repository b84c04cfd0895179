//! Contest listing and detail handlers.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::data::models::{Contest, ContestStatus, Platform};
use crate::data::store::ContestFilter;
use crate::state::AppState;
use crate::web::error::{ApiError, db_error};

/// A `status=past` listing never returns more than this many contests.
/// The backlog of old rounds grows without bound and nobody pages through
/// thousands of them.
const PAST_LIMIT: usize = 30;

#[derive(Deserialize)]
pub struct ListParams {
    /// Comma-separated platform names.
    pub platform: Option<String>,
    pub status: Option<String>,
}

fn parse_platforms(raw: &str) -> Result<Vec<Platform>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Platform::parse(s).ok_or_else(|| ApiError::invalid_platform(s)))
        .collect()
}

/// Keeps the most recently ended contests, restoring the start-time
/// ordering of the input.
fn cap_past(mut contests: Vec<Contest>) -> Vec<Contest> {
    if contests.len() <= PAST_LIMIT {
        return contests;
    }
    contests.sort_by_key(|c| std::cmp::Reverse(c.end_time));
    contests.truncate(PAST_LIMIT);
    contests.sort_by_key(|c| c.start_time);
    contests
}

/// `GET /api/contests?platform=codeforces,leetcode&status=upcoming`
///
/// Statuses are recomputed against the current clock so a contest whose
/// stored status went stale between aggregation runs still reads
/// correctly.
pub(super) async fn list_contests(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let platforms = match params.platform.as_deref() {
        Some(raw) => parse_platforms(raw)?,
        None => Vec::new(),
    };
    let status = match params.status.as_deref() {
        Some(raw) => Some(ContestStatus::parse(raw).ok_or_else(|| ApiError::invalid_status(raw))?),
        None => None,
    };

    let filter = ContestFilter {
        platforms,
        // Status filtering happens below, against the live clock rather
        // than the stored column.
        status: None,
    };
    let mut contests = state.store.find_contests(&filter).await.map_err(db_error)?;

    let now = Utc::now();
    for contest in &mut contests {
        contest.status = contest.status_at(now);
    }
    if let Some(status) = status {
        contests.retain(|c| c.status == status);
    }
    // The finished backlog is unbounded; only the explicit past listing
    // gets capped.
    let contests = if status == Some(ContestStatus::Past) {
        cap_past(contests)
    } else {
        contests
    };

    Ok(Json(json!({
        "success": true,
        "count": contests.len(),
        "data": contests,
    })))
}

/// `GET /api/contests/{id}`
pub(super) async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let mut contest = state
        .store
        .find_contest_by_id(id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| ApiError::not_found(format!("contest {id} not found")))?;
    contest.status = contest.status_at(Utc::now());

    Ok(Json(json!({ "success": true, "data": contest })))
}

/// `GET /api/contests/{id}/solution`
pub(super) async fn get_solution(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    // 404 on a missing contest is distinct from a contest with no
    // solution yet, which returns data: null.
    state
        .store
        .find_contest_by_id(id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| ApiError::not_found(format!("contest {id} not found")))?;

    let link = state.store.find_solution_link(id).await.map_err(db_error)?;
    Ok(Json(json!({ "success": true, "data": link })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn contest(id: i64, status: ContestStatus, ended_hours_ago: i64) -> Contest {
        let now = Utc::now();
        Contest {
            id,
            name: format!("Contest {id}"),
            platform: Platform::Codeforces,
            start_time: now - Duration::hours(ended_hours_ago + 2),
            end_time: now - Duration::hours(ended_hours_ago),
            url: "https://example.com".to_owned(),
            status,
        }
    }

    #[test]
    fn parse_platforms_rejects_unknown_names() {
        assert!(parse_platforms("codeforces,nopeforces").is_err());
        let ok = parse_platforms("codeforces, leetcode").unwrap();
        assert_eq!(ok, vec![Platform::Codeforces, Platform::LeetCode]);
    }

    #[test]
    fn cap_past_keeps_most_recently_ended() {
        let mut contests = Vec::new();
        for i in 0..40 {
            contests.push(contest(i, ContestStatus::Past, 40 - i));
        }

        let capped = cap_past(contests);
        assert_eq!(capped.len(), PAST_LIMIT);
        // Ids 10..40 ended most recently.
        assert!(capped.iter().all(|c| c.id >= 10));
        // Output stays in start-time order.
        assert!(capped.windows(2).all(|w| w[0].start_time <= w[1].start_time));
    }
}
