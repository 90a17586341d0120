//! Video platform abstractions.
//!
//! The publisher needs four calls from the platform; credentials and token
//! refresh are the implementor's business.

pub mod youtube;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Page, Playlist, VideoId};

// Re-export for convenience
pub use youtube::YouTubeClient;

/// Authenticated access to the user's playlists.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// One page of the authenticated user's playlists.
    async fn list_playlists(&self, page_token: Option<&str>) -> Result<Page<Playlist>>;

    /// Create a public playlist titled `title`.
    async fn create_playlist(&self, title: &str) -> Result<Playlist>;

    /// One page of the video identifiers in a playlist.
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<VideoId>>;

    /// Append a video to a playlist.
    ///
    /// A video that does not exist (or is not accessible) fails with a 404
    /// [`AppError::Status`].
    ///
    /// [`AppError::Status`]: crate::error::AppError::Status
    async fn insert_playlist_item(&self, playlist_id: &str, video: &VideoId) -> Result<()>;
}
