//! YouTube Data API v3 client backing the solution linker.
//!
//! Only the two list endpoints the linker needs. Pagination stops after
//! the first page of 50; channels with more playlists than that per
//! category are out of scope for now.

use crate::pipeline::linker::{Playlist, Video, VideoSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const PAGE_SIZE: u32 = 50;

pub struct YoutubeClient {
    client: reqwest::Client,
    api_key: String,
    channel_id: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistListResponse {
    #[serde(default)]
    items: Vec<PlaylistResource>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResource {
    id: String,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemListResponse {
    #[serde(default)]
    items: Vec<PlaylistItemResource>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemResource {
    snippet: ItemSnippet,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemSnippet {
    title: String,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

impl YoutubeClient {
    pub fn new(client: reqwest::Client, api_key: String, channel_id: String) -> Self {
        Self {
            client,
            api_key,
            channel_id,
        }
    }
}

#[async_trait]
impl VideoSource for YoutubeClient {
    async fn playlists(&self) -> Result<Vec<Playlist>> {
        let response: PlaylistListResponse = self
            .client
            .get(format!("{API_BASE}/playlists"))
            .query(&[
                ("part", "snippet"),
                ("channelId", self.channel_id.as_str()),
                ("maxResults", &PAGE_SIZE.to_string()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("requesting channel playlists")?
            .error_for_status()
            .context("channel playlists request rejected")?
            .json()
            .await
            .context("decoding channel playlists")?;

        Ok(response
            .items
            .into_iter()
            .map(|item| Playlist {
                id: item.id,
                title: item.snippet.title,
            })
            .collect())
    }

    async fn playlist_items(&self, playlist_id: &str) -> Result<Vec<Video>> {
        let response: PlaylistItemListResponse = self
            .client
            .get(format!("{API_BASE}/playlistItems"))
            .query(&[
                ("part", "snippet"),
                ("playlistId", playlist_id),
                ("maxResults", &PAGE_SIZE.to_string()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("requesting playlist items")?
            .error_for_status()
            .context("playlist items request rejected")?
            .json()
            .await
            .context("decoding playlist items")?;

        // Private or deleted videos come back without a videoId; skip them.
        Ok(response
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.snippet.resource_id.video_id?;
                Some(Video {
                    title: item.snippet.title,
                    url: format!("https://www.youtube.com/watch?v={id}"),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_item_decodes_and_skips_missing_video_id() {
        let raw = serde_json::json!({
            "items": [
                {
                    "snippet": {
                        "title": "Codeforces Round #971 Editorial",
                        "resourceId": { "kind": "youtube#video", "videoId": "abc123" }
                    }
                },
                {
                    "snippet": {
                        "title": "Private video",
                        "resourceId": { "kind": "youtube#video" }
                    }
                }
            ]
        });
        let parsed: PlaylistItemListResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(
            parsed.items[0].snippet.resource_id.video_id.as_deref(),
            Some("abc123")
        );
        assert!(parsed.items[1].snippet.resource_id.video_id.is_none());
    }

    #[test]
    fn playlist_list_tolerates_empty_items() {
        let parsed: PlaylistListResponse = serde_json::from_str(r#"{"kind":"youtube#playlistListResponse"}"#).unwrap();
        assert!(parsed.items.is_empty());
    }
}
