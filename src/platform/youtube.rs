// src/platform/youtube.rs

//! YouTube Data API v3 client.
//!
//! Only the four playlist calls the publisher needs. The OAuth access token
//! is obtained elsewhere and handed in as-is.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{Page, Playlist, VideoId};
use crate::platform::VideoPlatform;
use crate::utils::http::send_json;

/// Largest page the API hands out.
const MAX_RESULTS: &str = "50";

/// Playlist client authenticated with a bearer token.
pub struct YouTubeClient {
    client: Client,
    api_base: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResource {
    id: String,
    #[serde(default)]
    snippet: Option<PlaylistSnippet>,
}

#[derive(Debug, Deserialize)]
struct PlaylistSnippet {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemResource {
    snippet: ItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemSnippet {
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default)]
    video_id: Option<String>,
}

impl From<PlaylistResource> for Playlist {
    fn from(resource: PlaylistResource) -> Self {
        Self {
            id: resource.id,
            title: resource.snippet.map(|s| s.title).unwrap_or_default(),
        }
    }
}

impl YouTubeClient {
    pub fn new(client: Client, api_base: &str, access_token: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.api_base, resource)
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn list_playlists(&self, page_token: Option<&str>) -> Result<Page<Playlist>> {
        let url = self.endpoint("playlists");
        let mut query = vec![
            ("part", "snippet"),
            ("mine", "true"),
            ("maxResults", MAX_RESULTS),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        let request = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&query);
        let response: ListResponse<PlaylistResource> = send_json(request, &url).await?;

        Ok(Page {
            items: response.items.into_iter().map(Playlist::from).collect(),
            next_page_token: response.next_page_token,
        })
    }

    async fn create_playlist(&self, title: &str) -> Result<Playlist> {
        let url = self.endpoint("playlists");
        let body = json!({
            "snippet": { "title": title },
            "status": { "privacyStatus": "public" },
        });
        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .query(&[("part", "snippet,status")])
            .json(&body);
        let created: PlaylistResource = send_json(request, &url).await?;

        let mut playlist = Playlist::from(created);
        if playlist.title.is_empty() {
            playlist.title = title.to_string();
        }
        Ok(playlist)
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<VideoId>> {
        let url = self.endpoint("playlistItems");
        let mut query = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", MAX_RESULTS),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        let request = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&query);
        let response: ListResponse<PlaylistItemResource> = send_json(request, &url).await?;

        // Deleted videos can linger as items without a resource id.
        let items = response
            .items
            .into_iter()
            .filter_map(|item| item.snippet.resource_id.video_id)
            .map(VideoId::from)
            .collect();
        Ok(Page {
            items,
            next_page_token: response.next_page_token,
        })
    }

    async fn insert_playlist_item(&self, playlist_id: &str, video: &VideoId) -> Result<()> {
        let url = self.endpoint("playlistItems");
        let body = json!({
            "snippet": {
                "playlistId": playlist_id,
                "resourceId": { "kind": "youtube#video", "videoId": video.as_str() },
            }
        });
        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .query(&[("part", "snippet")])
            .json(&body);
        let inserted: serde_json::Value = send_json(request, &url).await?;

        if inserted.get("id").is_none() {
            return Err(AppError::platform(
                format!("insert {video}"),
                "response carries no item id",
            ));
        }
        Ok(())
    }
}
