//! In-memory board and platform doubles for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::board::BoardSource;
use crate::error::{AppError, Result};
use crate::models::{CatalogPage, Page, Playlist, Post, Thread, ThreadSummary, VideoId};
use crate::platform::VideoPlatform;

/// A post with a name and comment.
pub fn post(name: &str, com: &str) -> Post {
    Post {
        name: Some(name.to_string()),
        com: Some(com.to_string()),
        closed: false,
    }
}

/// A thread whose posts each link one short URL.
pub fn thread_linking(ids: &[&str]) -> Vec<Post> {
    ids.iter()
        .map(|id| post("Anonymous", &format!("http://youtu.be/{id}")))
        .collect()
}

enum Reply {
    Thread(Thread),
    Status(u16),
}

/// Scripted board.
#[derive(Default)]
pub struct FakeBoard {
    catalog: Mutex<Vec<ThreadSummary>>,
    threads: Mutex<HashMap<u64, Reply>>,
    resets: Mutex<u32>,
    catalog_fetches: Mutex<u32>,
    thread_fetches: Mutex<Vec<u64>>,
}

impl FakeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// List a thread in the catalog.
    pub fn list(&self, no: u64, subject: Option<&str>) -> &Self {
        self.catalog.lock().unwrap().push(ThreadSummary {
            no,
            sub: subject.map(str::to_string),
        });
        self
    }

    /// Drop a thread from the catalog.
    pub fn unlist(&self, no: u64) -> &Self {
        self.catalog.lock().unwrap().retain(|t| t.no != no);
        self
    }

    /// Serve `posts` for thread `no`.
    pub fn serve(&self, no: u64, posts: Vec<Post>) -> &Self {
        self.threads
            .lock()
            .unwrap()
            .insert(no, Reply::Thread(Thread { posts }));
        self
    }

    /// Serve thread `no` with its opening post flagged closed.
    pub fn serve_closed(&self, no: u64, mut posts: Vec<Post>) -> &Self {
        if let Some(op) = posts.first_mut() {
            op.closed = true;
        }
        self.serve(no, posts)
    }

    /// Answer thread `no` with an HTTP status.
    pub fn fail(&self, no: u64, status: u16) -> &Self {
        self.threads.lock().unwrap().insert(no, Reply::Status(status));
        self
    }

    /// Reset the next `count` catalog fetches.
    pub fn reset_catalog(&self, count: u32) -> &Self {
        *self.resets.lock().unwrap() = count;
        self
    }

    pub fn catalog_fetches(&self) -> u32 {
        *self.catalog_fetches.lock().unwrap()
    }

    pub fn thread_fetches(&self) -> Vec<u64> {
        self.thread_fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BoardSource for FakeBoard {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogPage>> {
        *self.catalog_fetches.lock().unwrap() += 1;
        let mut resets = self.resets.lock().unwrap();
        if *resets > 0 {
            *resets -= 1;
            return Err(AppError::ConnectionReset("connection reset by peer".into()));
        }
        // Spread threads over pages of two to exercise paging.
        let threads = self.catalog.lock().unwrap().clone();
        Ok(threads
            .chunks(2)
            .map(|chunk| CatalogPage {
                threads: chunk.to_vec(),
            })
            .collect())
    }

    async fn fetch_thread(&self, thread_no: u64) -> Result<Thread> {
        self.thread_fetches.lock().unwrap().push(thread_no);
        let url = format!("fake://thread/{thread_no}");
        match self.threads.lock().unwrap().get(&thread_no) {
            Some(Reply::Thread(thread)) => Ok(thread.clone()),
            Some(Reply::Status(status)) => Err(AppError::status(url, *status)),
            None => Err(AppError::status(url, 404)),
        }
    }
}

/// Playlist store with small pages.
pub struct FakePlatform {
    playlists: Mutex<Vec<(Playlist, Vec<VideoId>)>>,
    missing: Mutex<HashSet<VideoId>>,
    broken: Mutex<HashSet<VideoId>>,
    insert_calls: Mutex<Vec<VideoId>>,
    page_size: usize,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self {
            playlists: Mutex::default(),
            missing: Mutex::default(),
            broken: Mutex::default(),
            insert_calls: Mutex::default(),
            page_size: 2,
        }
    }
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing playlist holding `ids`; returns its id.
    pub fn add_playlist(&self, title: &str, ids: &[&str]) -> String {
        let mut playlists = self.playlists.lock().unwrap();
        let id = format!("PL{}", playlists.len());
        playlists.push((
            Playlist {
                id: id.clone(),
                title: title.to_string(),
            },
            ids.iter().map(|v| VideoId::from(*v)).collect(),
        ));
        id
    }

    /// Inserting `id` answers 404.
    pub fn mark_missing(&self, id: &str) {
        self.missing.lock().unwrap().insert(VideoId::from(id));
    }

    /// Inserting `id` answers 500.
    pub fn mark_broken(&self, id: &str) {
        self.broken.lock().unwrap().insert(VideoId::from(id));
    }

    pub fn titles(&self) -> Vec<String> {
        let playlists = self.playlists.lock().unwrap();
        playlists.iter().map(|(p, _)| p.title.clone()).collect()
    }

    pub fn items(&self, playlist_id: &str) -> Vec<String> {
        let playlists = self.playlists.lock().unwrap();
        playlists
            .iter()
            .find(|(p, _)| p.id == playlist_id)
            .map(|(_, ids)| ids.iter().map(|v| v.to_string()).collect())
            .unwrap_or_default()
    }

    pub fn insert_calls(&self) -> Vec<String> {
        let calls = self.insert_calls.lock().unwrap();
        calls.iter().map(|v| v.to_string()).collect()
    }

    fn page<T: Clone>(&self, all: &[T], page_token: Option<&str>) -> Page<T> {
        let start: usize = page_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = (start + self.page_size).min(all.len());
        Page {
            items: all[start.min(end)..end].to_vec(),
            next_page_token: (end < all.len()).then(|| end.to_string()),
        }
    }
}

#[async_trait]
impl VideoPlatform for FakePlatform {
    async fn list_playlists(&self, page_token: Option<&str>) -> Result<Page<Playlist>> {
        let all: Vec<Playlist> = {
            let playlists = self.playlists.lock().unwrap();
            playlists.iter().map(|(p, _)| p.clone()).collect()
        };
        Ok(self.page(&all, page_token))
    }

    async fn create_playlist(&self, title: &str) -> Result<Playlist> {
        let id = self.add_playlist(title, &[]);
        Ok(Playlist {
            id,
            title: title.to_string(),
        })
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<VideoId>> {
        let all: Vec<VideoId> = {
            let playlists = self.playlists.lock().unwrap();
            playlists
                .iter()
                .find(|(p, _)| p.id == playlist_id)
                .map(|(_, ids)| ids.clone())
                .ok_or_else(|| AppError::status(playlist_id, 404))?
        };
        Ok(self.page(&all, page_token))
    }

    async fn insert_playlist_item(&self, playlist_id: &str, video: &VideoId) -> Result<()> {
        self.insert_calls.lock().unwrap().push(video.clone());
        if self.missing.lock().unwrap().contains(video) {
            return Err(AppError::status("fake://playlistItems", 404));
        }
        if self.broken.lock().unwrap().contains(video) {
            return Err(AppError::status("fake://playlistItems", 500));
        }
        let mut playlists = self.playlists.lock().unwrap();
        let (_, ids) = playlists
            .iter_mut()
            .find(|(p, _)| p.id == playlist_id)
            .ok_or_else(|| AppError::status(playlist_id, 404))?;
        ids.push(video.clone());
        Ok(())
    }
}
