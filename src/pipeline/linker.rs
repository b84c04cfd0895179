//! Solution linker: resolve editorial videos to stored contests.
//!
//! Video titles carry a provider-specific contest identifier ("Codeforces
//! Round #900 Editorial", "LeetCode Weekly Contest 431 Screencast"). The
//! extraction rules are a declarative per-platform table so a channel's
//! title-format change is a data change, not a logic change. Linking is
//! additive-only: an existing link, however it got there, is never touched.

use crate::data::models::Platform;
use crate::data::store::Store;
use anyhow::Result;
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::sync::Arc;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// A playlist on the configured channel.
#[derive(Debug, Clone)]
pub struct Playlist {
    pub id: String,
    pub title: String,
}

/// A video's metadata as the linker needs it.
#[derive(Debug, Clone)]
pub struct Video {
    pub title: String,
    pub url: String,
}

/// The upstream video-listing surface (YouTube in production, a stub in
/// tests).
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn playlists(&self) -> Result<Vec<Playlist>>;
    async fn playlist_items(&self, playlist_id: &str) -> Result<Vec<Video>>;
}

/// One platform's title pattern and how to render its captures into a
/// name fragment searchable against stored contest names.
struct TitleRule {
    platform: Platform,
    pattern: Regex,
    render: fn(&Captures) -> String,
}

static TITLE_RULES: LazyLock<Vec<TitleRule>> = LazyLock::new(|| {
    vec![
        TitleRule {
            platform: Platform::Codeforces,
            pattern: Regex::new(r"(?i)Codeforces Round #?(\d+)").unwrap(),
            render: |caps| format!("Round {}", &caps[1]),
        },
        TitleRule {
            platform: Platform::CodeChef,
            pattern: Regex::new(r"(?i)CodeChef (\w+) Contest").unwrap(),
            render: |caps| caps[1].to_owned(),
        },
        TitleRule {
            platform: Platform::LeetCode,
            pattern: Regex::new(r"(?i)LeetCode (Weekly|Biweekly) Contest (\d+)").unwrap(),
            render: |caps| format!("{} Contest {}", &caps[1], &caps[2]),
        },
    ]
});

/// Extract the contest-name fragment a video title refers to, or `None`
/// when the title doesn't mention a contest in the platform's format.
pub fn extract_identifier(platform: Platform, title: &str) -> Option<String> {
    let rule = TITLE_RULES.iter().find(|rule| rule.platform == platform)?;
    rule.pattern
        .captures(title)
        .map(|caps| (rule.render)(&caps))
}

/// Which platform a playlist's videos are editorials for.
pub fn infer_platform(playlist_title: &str) -> Option<Platform> {
    let lowered = playlist_title.to_lowercase();
    if lowered.contains("leetcode") {
        Some(Platform::LeetCode)
    } else if lowered.contains("codeforces") {
        Some(Platform::Codeforces)
    } else if lowered.contains("codechef") {
        Some(Platform::CodeChef)
    } else {
        None
    }
}

/// Per-run accounting for the linker. No-match, ambiguous, and existing
/// are steady-state outcomes, not failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkerSummary {
    pub playlists: usize,
    pub videos: usize,
    pub linked: usize,
    pub already_linked: usize,
    pub no_match: usize,
    pub ambiguous: usize,
    pub unrecognized_titles: usize,
}

pub struct SolutionLinker {
    store: Arc<dyn Store>,
    source: Arc<dyn VideoSource>,
}

impl SolutionLinker {
    pub fn new(store: Arc<dyn Store>, source: Arc<dyn VideoSource>) -> Self {
        Self { store, source }
    }

    /// Walk the channel's playlists and attach at most one solution link
    /// per resolved contest. Never mutates contest records.
    pub async fn run(&self) -> Result<LinkerSummary> {
        let mut summary = LinkerSummary::default();

        let playlists = self.source.playlists().await?;
        for playlist in &playlists {
            let Some(platform) = infer_platform(&playlist.title) else {
                debug!(playlist = %playlist.title, "playlist matches no platform, skipping");
                continue;
            };
            summary.playlists += 1;

            let videos = match self.source.playlist_items(&playlist.id).await {
                Ok(videos) => videos,
                Err(e) => {
                    // One playlist's failure shouldn't sink the rest.
                    warn!(playlist = %playlist.title, error = %e, "playlist listing failed, skipping");
                    continue;
                }
            };

            for video in videos {
                summary.videos += 1;
                self.link_video(platform, &video, &mut summary).await?;
            }
        }

        info!(
            playlists = summary.playlists,
            videos = summary.videos,
            linked = summary.linked,
            already_linked = summary.already_linked,
            no_match = summary.no_match,
            ambiguous = summary.ambiguous,
            "solution link run complete"
        );

        Ok(summary)
    }

    async fn link_video(
        &self,
        platform: Platform,
        video: &Video,
        summary: &mut LinkerSummary,
    ) -> Result<()> {
        let Some(fragment) = extract_identifier(platform, &video.title) else {
            debug!(title = %video.title, "no contest identifier in title");
            summary.unrecognized_titles += 1;
            return Ok(());
        };

        let matches = self.store.search_contests(platform, &fragment).await?;
        let contest = match matches.as_slice() {
            [] => {
                debug!(platform = %platform, fragment = %fragment, "no stored contest matches");
                summary.no_match += 1;
                return Ok(());
            }
            [single] => single,
            _ => {
                debug!(
                    platform = %platform,
                    fragment = %fragment,
                    candidates = matches.len(),
                    "identifier is ambiguous, skipping"
                );
                summary.ambiguous += 1;
                return Ok(());
            }
        };

        if self.store.find_solution_link(contest.id).await?.is_some() {
            summary.already_linked += 1;
            return Ok(());
        }

        self.store
            .upsert_solution_link(contest.id, &video.url, false)
            .await?;
        info!(contest = %contest.name, url = %video.url, "solution link attached");
        summary.linked += 1;
        Ok(())
    }
}
