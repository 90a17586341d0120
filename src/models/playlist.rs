//! Remote playlist handles.

use serde::{Deserialize, Serialize};

/// A playlist owned by the video platform.
///
/// Only ever changed through the platform's create and insert calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub title: String,
}

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}
