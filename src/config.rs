//! Application configuration loaded from the environment.

use serde::Deserialize;
use std::time::Duration;

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_owned()
}

/// Six hours between contest fetches.
fn default_contest_fetch_interval() -> u64 {
    6 * 60 * 60
}

/// Solution playlists update rarely; once a day is plenty.
fn default_solution_sync_interval() -> u64 {
    24 * 60 * 60
}

fn default_shutdown_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_contest_fetch_interval")]
    pub contest_fetch_interval_secs: u64,

    #[serde(default = "default_solution_sync_interval")]
    pub solution_sync_interval_secs: u64,

    /// Seconds to wait for in-flight work on shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Video linking is optional; without both of these the linker is
    /// disabled and only contest aggregation runs.
    pub youtube_api_key: Option<String>,
    pub youtube_channel_id: Option<String>,
}

impl Config {
    pub fn contest_fetch_interval(&self) -> Duration {
        Duration::from_secs(self.contest_fetch_interval_secs)
    }

    pub fn solution_sync_interval(&self) -> Duration {
        Duration::from_secs(self.solution_sync_interval_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
