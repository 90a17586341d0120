// src/services/tracker.rs

//! Catalog tracker.
//!
//! Keeps the set of watched threads on one board and the video identifiers
//! found in them. Each poll:
//!
//! 1. fetches the catalog, retrying connection resets after a cooldown;
//! 2. starts watching every thread whose subject matches;
//! 3. fetches every watched thread and extracts links from its comments;
//! 4. retires threads that are gone (404/403) or flagged closed.
//!
//! A retired thread is never fetched again.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::board::BoardSource;
use crate::error::Result;
use crate::models::{BoardConfig, CatalogPage, Thread, TimingConfig, VideoId};
use crate::services::extractor::extract_video_ids;
use crate::services::matcher::{self, SubjectMatcher};
use crate::utils::pause;

/// How catalog fetches recover from connection resets.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Wait between attempts
    pub cooldown: Duration,
    /// Give up after this many resets in a row; `None` retries forever
    pub limit: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(300),
            limit: None,
        }
    }
}

impl From<&TimingConfig> for RetryPolicy {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            cooldown: timing.reset_cooldown(),
            limit: timing.retry_limit(),
        }
    }
}

/// Counts from one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollReport {
    /// Identifiers not seen before this poll
    pub new_ids: usize,
    /// Threads still watched after the poll
    pub watched: usize,
    /// Threads picked up from the catalog this poll
    pub newly_watched: usize,
    /// Threads retired this poll
    pub newly_dead: usize,
}

/// Watches matching threads on a board and accumulates their video links.
pub struct CatalogTracker {
    source: Arc<dyn BoardSource>,
    matcher: Box<dyn SubjectMatcher>,
    ignored_names: HashSet<String>,
    retry: RetryPolicy,
    cancel: CancellationToken,

    watched: BTreeSet<u64>,
    dead: BTreeSet<u64>,
    seen: HashSet<VideoId>,
}

impl CatalogTracker {
    /// Create a tracker with no ignored names and the default retry policy.
    pub fn new(source: Arc<dyn BoardSource>, matcher: Box<dyn SubjectMatcher>) -> Self {
        Self {
            source,
            matcher,
            ignored_names: HashSet::new(),
            retry: RetryPolicy::default(),
            cancel: CancellationToken::new(),
            watched: BTreeSet::new(),
            dead: BTreeSet::new(),
            seen: HashSet::new(),
        }
    }

    /// Build a tracker from configuration.
    pub fn from_config(
        source: Arc<dyn BoardSource>,
        board: &BoardConfig,
        timing: &TimingConfig,
    ) -> Result<Self> {
        let matcher = matcher::from_config(&board.matcher)?;
        Ok(Self::new(source, matcher)
            .with_ignored_names(board.ignored_names.iter().cloned())
            .with_retry(RetryPolicy::from(timing)))
    }

    pub fn with_ignored_names(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.ignored_names = names.into_iter().collect();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Interrupt reset cooldowns when `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Watch a thread whatever its subject. Retired threads stay retired.
    pub fn watch(&mut self, thread_no: u64) -> bool {
        !self.dead.contains(&thread_no) && self.watched.insert(thread_no)
    }

    pub fn watched(&self) -> &BTreeSet<u64> {
        &self.watched
    }

    pub fn dead(&self) -> &BTreeSet<u64> {
        &self.dead
    }

    /// Every identifier accumulated so far.
    pub fn seen(&self) -> &HashSet<VideoId> {
        &self.seen
    }

    /// Forget accumulated identifiers.
    pub fn flush_seen(&mut self) {
        self.seen.clear();
    }

    /// Count `ids` as already seen, so they don't show up as new.
    pub fn seed_seen(&mut self, ids: impl IntoIterator<Item = VideoId>) {
        self.seen.extend(ids);
    }

    /// Accumulated identifiers as sorted watch URLs.
    pub fn links(&self) -> Vec<String> {
        let mut links: Vec<String> = self.seen.iter().map(VideoId::watch_url).collect();
        links.sort();
        links
    }

    /// Run one poll cycle.
    ///
    /// Transport errors other than connection resets (catalog) and gone
    /// threads (per thread) abort the poll; accumulated state is left as it
    /// was apart from newly watched threads.
    pub async fn poll(&mut self) -> Result<PollReport> {
        let catalog = self.fetch_catalog().await?;

        let mut newly_watched = 0;
        for thread_no in self.filter_catalog(&catalog) {
            if self.watch(thread_no) {
                newly_watched += 1;
            }
        }

        let mut found = HashSet::new();
        let mut retired = BTreeSet::new();
        let watched: Vec<u64> = self.watched.iter().copied().collect();
        for thread_no in watched {
            match self.source.fetch_thread(thread_no).await {
                Ok(thread) => {
                    found.extend(self.scrape_thread(&thread));
                    if thread.is_closed() {
                        log::debug!("Thread {} is closed", thread_no);
                        retired.insert(thread_no);
                    }
                }
                Err(e) if e.is_gone() => {
                    log::debug!("Thread {} is gone: {}", thread_no, e);
                    retired.insert(thread_no);
                }
                Err(e) => return Err(e),
            }
        }

        let new_ids = found
            .into_iter()
            .filter(|id| self.seen.insert(id.clone()))
            .count();

        self.watched.retain(|no| !retired.contains(no));
        let newly_dead = retired.len();
        self.dead.extend(retired);

        let report = PollReport {
            new_ids,
            watched: self.watched.len(),
            newly_watched,
            newly_dead,
        };
        log::info!(
            "Scraped {} new links from {} threads ({} new threads added, {} closed threads removed)",
            report.new_ids,
            report.watched,
            report.newly_watched,
            report.newly_dead
        );
        Ok(report)
    }

    /// Fetch the catalog, sitting out connection resets.
    async fn fetch_catalog(&self) -> Result<Vec<CatalogPage>> {
        let mut resets = 0u32;
        loop {
            match self.source.fetch_catalog().await {
                Ok(catalog) => return Ok(catalog),
                Err(e) if e.is_transient() => {
                    resets += 1;
                    if self.retry.limit.is_some_and(|limit| resets >= limit) {
                        log::error!("Catalog fetch reset {} times, giving up", resets);
                        return Err(e);
                    }
                    log::warn!(
                        "Connection reset error, waiting {} seconds",
                        self.retry.cooldown.as_secs()
                    );
                    pause(&self.cancel, self.retry.cooldown).await?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Thread numbers in the catalog whose subject matches.
    fn filter_catalog(&self, catalog: &[CatalogPage]) -> BTreeSet<u64> {
        catalog
            .iter()
            .flat_map(|page| page.threads.iter())
            .filter(|thread| self.matcher.matches(thread.subject()))
            .map(|thread| thread.no)
            .collect()
    }

    /// Identifiers linked in a thread, skipping ignored posters and
    /// comment-less posts.
    fn scrape_thread(&self, thread: &Thread) -> HashSet<VideoId> {
        thread
            .posts
            .iter()
            .filter(|post| {
                let name = post.name.as_deref().unwrap_or("");
                !self.ignored_names.contains(name)
            })
            .filter_map(|post| post.com.as_deref())
            .flat_map(extract_video_ids)
            .collect()
    }
}
