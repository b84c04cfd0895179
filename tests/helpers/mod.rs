//! Shared fixtures for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use podium::data::models::{ContestDraft, Platform};
use podium::pipeline::{Playlist, Video, VideoSource};
use podium::platforms::{FetchError, SourceAdapter};
use std::sync::Mutex;

/// A draft starting `start_in_hours` from `now` and running two hours.
pub fn make_draft(name: &str, platform: Platform, now: DateTime<Utc>, start_in_hours: i64) -> ContestDraft {
    ContestDraft {
        name: name.to_owned(),
        platform,
        start_time: now + Duration::hours(start_in_hours),
        end_time: now + Duration::hours(start_in_hours + 2),
        url: format!("https://example.com/{}", name.replace(' ', "-").to_lowercase()),
    }
}

/// Adapter serving a canned batch, or failing every call.
pub struct StubAdapter {
    platform: Platform,
    result: Mutex<Vec<ContestDraft>>,
    fail: bool,
}

impl StubAdapter {
    pub fn serving(platform: Platform, drafts: Vec<ContestDraft>) -> Self {
        Self {
            platform,
            result: Mutex::new(drafts),
            fail: false,
        }
    }

    pub fn failing(platform: Platform) -> Self {
        Self {
            platform,
            result: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl SourceAdapter for StubAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch(&self) -> Result<Vec<ContestDraft>, FetchError> {
        if self.fail {
            return Err(FetchError::Unavailable(anyhow::anyhow!(
                "connection refused"
            )));
        }
        Ok(self.result.lock().unwrap().clone())
    }
}

/// Video source serving canned playlists.
pub struct StubVideoSource {
    pub playlists: Vec<(Playlist, Vec<Video>)>,
}

#[async_trait]
impl VideoSource for StubVideoSource {
    async fn playlists(&self) -> anyhow::Result<Vec<Playlist>> {
        Ok(self.playlists.iter().map(|(p, _)| p.clone()).collect())
    }

    async fn playlist_items(&self, playlist_id: &str) -> anyhow::Result<Vec<Video>> {
        Ok(self
            .playlists
            .iter()
            .find(|(p, _)| p.id == playlist_id)
            .map(|(_, videos)| videos.clone())
            .unwrap_or_default())
    }
}
