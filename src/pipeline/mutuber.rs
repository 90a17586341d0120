// src/pipeline/mutuber.rs

//! Publishing loop.
//!
//! Each cycle resolves (or creates) the playlist for the current tag,
//! polls the board, and appends every scraped identifier that is not yet
//! known to be published.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::board::BoardSource;
use crate::error::{AppError, Result};
use crate::models::{Config, Playlist, PlaylistConfig, TimingConfig, VideoId};
use crate::platform::VideoPlatform;
use crate::services::{
    CatalogTracker, PlaylistResolver, PollReport, PublishOutcome, ResolveAction,
};
use crate::utils::pause;
use crate::utils::tag::TagFormat;

/// Summary of one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub at: NaiveDateTime,
    pub tag: String,
    pub playlist_id: String,
    pub created: bool,
    pub poll: PollReport,
    pub pending: usize,
    pub published: usize,
    pub skipped: usize,
}

/// Scrapes a board and keeps the dated playlists in sync with it.
///
/// Videos the platform reports missing are not offered again. In
/// current-only mode that memory lasts until the playlist changes; otherwise
/// it lasts for the life of the value.
pub struct Mutuber {
    tracker: CatalogTracker,
    playlists: PlaylistResolver,
    settings: PlaylistConfig,
    publish_pause: Duration,
    poll_pause: Duration,
    cancel: CancellationToken,

    playlist: Option<Playlist>,
    published: HashSet<VideoId>,
    rejected: HashSet<VideoId>,
    primed: bool,
}

impl Mutuber {
    pub fn new(
        tracker: CatalogTracker,
        platform: Arc<dyn VideoPlatform>,
        settings: PlaylistConfig,
        timing: &TimingConfig,
    ) -> Result<Self> {
        let format = TagFormat::new(&settings.prefix, &settings.time_format)?;
        Ok(Self {
            tracker,
            playlists: PlaylistResolver::new(platform, format),
            settings,
            publish_pause: timing.publish_pause(),
            poll_pause: timing.poll_pause(),
            cancel: CancellationToken::new(),
            playlist: None,
            published: HashSet::new(),
            rejected: HashSet::new(),
            primed: false,
        })
    }

    /// Build the whole loop from configuration.
    pub fn from_config(
        config: &Config,
        board: Arc<dyn BoardSource>,
        platform: Arc<dyn VideoPlatform>,
    ) -> Result<Self> {
        let tracker = CatalogTracker::from_config(board, &config.board, &config.timing)?;
        Self::new(tracker, platform, config.playlist.clone(), &config.timing)
    }

    /// Stop waiting (pacing, cooldowns) once `cancel` fires.
    pub fn with_cancel(self, cancel: CancellationToken) -> Self {
        let tracker = self.tracker.with_cancel(cancel.clone());
        Self {
            tracker,
            cancel,
            ..self
        }
    }

    pub fn tracker(&self) -> &CatalogTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut CatalogTracker {
        &mut self.tracker
    }

    /// Playlist resolved by the last cycle.
    pub fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    /// Identifiers known to be in the tracked playlists.
    pub fn published(&self) -> &HashSet<VideoId> {
        &self.published
    }

    /// Run one cycle for the current local time.
    pub async fn run_once(&mut self) -> Result<CycleReport> {
        self.run_cycle_at(Local::now().naive_local()).await
    }

    /// Run one cycle as if the clock read `now`.
    pub async fn run_cycle_at(&mut self, now: NaiveDateTime) -> Result<CycleReport> {
        let tag = self.playlists.format().encode(now)?;
        let (playlist, action) = self
            .playlists
            .resolve_or_create(now, |tag| self.settings.title_for(tag))
            .await?;
        match action {
            ResolveAction::Retrieved => log::info!("Retrieved playlist for tag: {}", tag),
            ResolveAction::Created => log::info!("Created new playlist for tag: {}", tag),
        }

        if self.settings.current_only {
            // Only this bucket counts; earlier buckets may be republished.
            if self.playlist.as_ref().is_some_and(|p| p.id != playlist.id) {
                self.rejected.clear();
            }
            self.tracker.flush_seen();
            self.published = self.playlists.published_ids(&playlist).await?;
        } else if !self.primed {
            self.published = self.playlists.all_published_ids().await?;
            self.primed = true;
        }
        self.playlist = Some(playlist.clone());

        self.tracker.seed_seen(self.published.iter().cloned());
        let poll = self.tracker.poll().await?;

        let mut pending: Vec<VideoId> = self
            .tracker
            .seen()
            .iter()
            .filter(|id| !self.published.contains(*id) && !self.rejected.contains(*id))
            .cloned()
            .collect();
        pending.sort();

        let mut published = 0;
        let mut skipped = 0;
        for video in &pending {
            match self.playlists.publish(&playlist, video).await? {
                PublishOutcome::Published => {
                    log::info!("Inserted: {}", video);
                    self.published.insert(video.clone());
                    published += 1;
                }
                PublishOutcome::SkippedNotFound => {
                    log::warn!("Failed to insert: {} (video not found)", video);
                    self.rejected.insert(video.clone());
                    skipped += 1;
                }
            }
            pause(&self.cancel, self.publish_pause).await?;
        }

        log::info!(
            "Published {} of {} pending links to {} ({} skipped)",
            published,
            pending.len(),
            playlist.title,
            skipped
        );

        Ok(CycleReport {
            at: now,
            tag,
            playlist_id: playlist.id,
            created: action == ResolveAction::Created,
            poll,
            pending: pending.len(),
            published,
            skipped,
        })
    }

    /// Cycle until cancelled. Any other error ends the loop.
    pub async fn run_forever(&mut self) -> Result<()> {
        loop {
            if self.cancel.is_cancelled() {
                break;
            }
            match self.run_once().await {
                Ok(_) => {}
                Err(AppError::Cancelled) => break,
                Err(e) => return Err(e),
            }
            log::debug!("Sleeping {} seconds", self.poll_pause.as_secs());
            match pause(&self.cancel, self.poll_pause).await {
                Ok(()) => {}
                Err(AppError::Cancelled) => break,
                Err(e) => return Err(e),
            }
        }
        log::info!("Stopped");
        Ok(())
    }
}
