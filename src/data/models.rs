//! Canonical contest domain types shared by adapters, pipeline, and web.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream providers we aggregate from. Closed set at this version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Codeforces,
    CodeChef,
    LeetCode,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Codeforces, Platform::CodeChef, Platform::LeetCode];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Codeforces => "Codeforces",
            Platform::CodeChef => "CodeChef",
            Platform::LeetCode => "LeetCode",
        }
    }

    /// Parse a stored or query-supplied platform name (case-insensitive).
    pub fn parse(s: &str) -> Option<Platform> {
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time classification of a contest relative to its bounds.
///
/// The stored column is a write-time cache of this value; the web layer
/// recomputes it from the time bounds on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    Upcoming,
    Ongoing,
    Past,
}

impl ContestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContestStatus::Upcoming => "upcoming",
            ContestStatus::Ongoing => "ongoing",
            ContestStatus::Past => "past",
        }
    }

    pub fn parse(s: &str) -> Option<ContestStatus> {
        match s {
            "upcoming" => Some(ContestStatus::Upcoming),
            "ongoing" => Some(ContestStatus::Ongoing),
            "past" => Some(ContestStatus::Past),
            _ => None,
        }
    }
}

impl fmt::Display for ContestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a contest against an explicit `now`.
///
/// Boundaries are closed on the ongoing interval's start and open on its
/// end: `now == start` is ongoing, `now == end` is past. The three states
/// partition the timeline with no gap or overlap.
pub fn classify(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> ContestStatus {
    if now < start {
        ContestStatus::Upcoming
    } else if now < end {
        ContestStatus::Ongoing
    } else {
        ContestStatus::Past
    }
}

/// A normalized contest as produced by a source adapter: not yet
/// status-classified, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestDraft {
    pub name: String,
    pub platform: Platform,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub url: String,
}

impl ContestDraft {
    /// Attach a write-time status, yielding a record ready for the store.
    pub fn classify_at(self, now: DateTime<Utc>) -> ContestRecord {
        let status = classify(now, self.start_time, self.end_time);
        ContestRecord {
            name: self.name,
            platform: self.platform,
            start_time: self.start_time,
            end_time: self.end_time,
            url: self.url,
            status,
        }
    }
}

/// A classified contest ready for reconciliation. Upsert key: `(name, platform)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestRecord {
    pub name: String,
    pub platform: Platform,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub url: String,
    pub status: ContestStatus,
}

/// A persisted contest as read back from the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: i64,
    pub name: String,
    pub platform: Platform,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub url: String,
    pub status: ContestStatus,
}

impl Contest {
    /// Status recomputed from the time bounds, ignoring the stored cache.
    pub fn status_at(&self, now: DateTime<Utc>) -> ContestStatus {
        classify(now, self.start_time, self.end_time)
    }
}

/// An external solution video attached to a contest. At most one per contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionLink {
    pub contest_id: i64,
    pub url: String,
    pub added_manually: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, 0, 0).single().unwrap()
    }

    #[test]
    fn classify_partitions_the_timeline() {
        let (start, end) = (at(10), at(12));
        assert_eq!(classify(at(9), start, end), ContestStatus::Upcoming);
        assert_eq!(classify(at(11), start, end), ContestStatus::Ongoing);
        assert_eq!(classify(at(13), start, end), ContestStatus::Past);
    }

    #[test]
    fn classify_boundaries_close_on_ongoing_start() {
        let (start, end) = (at(10), at(12));
        // now == start belongs to the ongoing interval.
        assert_eq!(classify(start, start, end), ContestStatus::Ongoing);
        // now == end has already left it.
        assert_eq!(classify(end, start, end), ContestStatus::Past);
    }

    #[test]
    fn classify_one_second_before_end_is_ongoing() {
        let (start, end) = (at(10), at(12));
        let now = end - chrono::Duration::seconds(1);
        assert_eq!(classify(now, start, end), ContestStatus::Ongoing);
    }

    #[test]
    fn platform_round_trips_through_parse() {
        for p in Platform::ALL {
            assert_eq!(Platform::parse(p.as_str()), Some(p));
        }
        assert_eq!(Platform::parse("leetcode"), Some(Platform::LeetCode));
        assert_eq!(Platform::parse("topcoder"), None);
    }

    #[test]
    fn status_parse_rejects_unknown() {
        assert_eq!(ContestStatus::parse("ongoing"), Some(ContestStatus::Ongoing));
        assert_eq!(ContestStatus::parse("finished"), None);
    }
}
