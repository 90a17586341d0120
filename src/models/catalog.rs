// src/models/catalog.rs

//! Board catalog and thread documents as served by the read-only JSON API.

use serde::{Deserialize, Deserializer};

/// One page of the board catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub threads: Vec<ThreadSummary>,
}

/// Catalog entry for a single thread.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadSummary {
    /// Thread number
    pub no: u64,

    /// Subject line, absent on many threads
    #[serde(default)]
    pub sub: Option<String>,
}

impl ThreadSummary {
    pub fn subject(&self) -> &str {
        self.sub.as_deref().unwrap_or("")
    }
}

/// Full thread document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thread {
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl Thread {
    /// The opening post carries the closed flag for the whole thread.
    pub fn is_closed(&self) -> bool {
        self.posts.first().is_some_and(|op| op.closed)
    }
}

/// A single post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Post {
    /// Posting name (without trip)
    #[serde(default)]
    pub name: Option<String>,

    /// Comment body as HTML; missing on image-only posts
    #[serde(default)]
    pub com: Option<String>,

    /// Sent as `1` on closed threads
    #[serde(default, deserialize_with = "flag")]
    pub closed: bool,
}

/// Accept `0`/`1` as well as `true`/`false`.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(i)) => i != 0,
        None => false,
    })
}
