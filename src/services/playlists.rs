// src/services/playlists.rs

//! Playlist state resolver.
//!
//! Finds the playlists belonging to one tag series on the video platform,
//! picks the one for the current time bucket, and reads back what has
//! already been published.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::models::{Playlist, VideoId};
use crate::platform::VideoPlatform;
use crate::utils::tag::TagFormat;

/// Outcome of looking up the playlist for a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A playlist carries the tag
    Found(Playlist),
    /// No playlist carries the tag yet
    Missing { tag: String },
}

/// What happened when the current playlist was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveAction {
    Retrieved,
    Created,
}

/// Outcome of publishing one video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    /// The platform has no such video; not worth retrying
    SkippedNotFound,
}

/// Tag-aware view of the user's playlists.
pub struct PlaylistResolver {
    platform: Arc<dyn VideoPlatform>,
    format: TagFormat,
}

impl PlaylistResolver {
    pub fn new(platform: Arc<dyn VideoPlatform>, format: TagFormat) -> Self {
        Self { platform, format }
    }

    pub fn format(&self) -> &TagFormat {
        &self.format
    }

    /// Playlists of this series keyed by canonical tag.
    ///
    /// Titles without a decodable leading tag, or with another series'
    /// prefix, are left out. When two playlists carry the same tag the one
    /// listed later replaces the earlier.
    pub async fn tagged_playlists(&self) -> Result<HashMap<String, Playlist>> {
        let mut tagged = HashMap::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.platform.list_playlists(page_token.as_deref()).await?;
            for playlist in page.items {
                let Some(tag) = self.format.tag_of_title(&playlist.title) else {
                    continue;
                };
                if let Some(shadowed) = tagged.insert(tag.clone(), playlist) {
                    log::warn!(
                        "Playlist {} shadowed by a later playlist tagged {}",
                        shadowed.id,
                        tag
                    );
                }
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(tagged)
    }

    /// Look up the playlist for the bucket containing `now`.
    pub async fn resolve(&self, now: NaiveDateTime) -> Result<Resolution> {
        let tag = self.format.encode(now)?;
        let mut tagged = self.tagged_playlists().await?;
        Ok(match tagged.remove(&tag) {
            Some(playlist) => Resolution::Found(playlist),
            None => Resolution::Missing { tag },
        })
    }

    /// Look up the playlist for `now`, creating it if needed.
    pub async fn resolve_or_create(
        &self,
        now: NaiveDateTime,
        title_for: impl Fn(&str) -> String,
    ) -> Result<(Playlist, ResolveAction)> {
        match self.resolve(now).await? {
            Resolution::Found(playlist) => Ok((playlist, ResolveAction::Retrieved)),
            Resolution::Missing { tag } => {
                let playlist = self.create_tagged(&title_for(&tag)).await?;
                Ok((playlist, ResolveAction::Created))
            }
        }
    }

    /// Create a public playlist; `title` must already start with its tag.
    pub async fn create_tagged(&self, title: &str) -> Result<Playlist> {
        self.platform.create_playlist(title).await
    }

    /// Every video identifier in `playlist`.
    pub async fn published_ids(&self, playlist: &Playlist) -> Result<HashSet<VideoId>> {
        let mut ids = HashSet::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .platform
                .list_playlist_items(&playlist.id, page_token.as_deref())
                .await?;
            ids.extend(page.items);
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(ids)
    }

    /// Every video identifier in every playlist of this series.
    pub async fn all_published_ids(&self) -> Result<HashSet<VideoId>> {
        let mut ids = HashSet::new();
        for playlist in self.tagged_playlists().await?.values() {
            ids.extend(self.published_ids(playlist).await?);
        }
        Ok(ids)
    }

    /// Append `video` to `playlist`.
    ///
    /// A 404 from the platform means the video does not exist and is
    /// reported as [`PublishOutcome::SkippedNotFound`]; any other failure is
    /// returned as an error.
    pub async fn publish(&self, playlist: &Playlist, video: &VideoId) -> Result<PublishOutcome> {
        match self.platform.insert_playlist_item(&playlist.id, video).await {
            Ok(()) => Ok(PublishOutcome::Published),
            Err(e) if e.is_not_found() => Ok(PublishOutcome::SkippedNotFound),
            Err(e) => Err(e),
        }
    }
}
