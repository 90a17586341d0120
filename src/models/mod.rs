// src/models/mod.rs

//! Domain models for the scraper and playlist publisher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod catalog;
mod config;
mod playlist;
mod video;

// Re-export all public types
pub use catalog::{CatalogPage, Post, Thread, ThreadSummary};
pub use config::{
    BoardConfig, Config, HttpConfig, MatcherConfig, PlatformConfig, PlaylistConfig, TimingConfig,
};
pub use playlist::{Page, Playlist};
pub use video::{VIDEO_ID_LEN, VideoId};
