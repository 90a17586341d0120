//! Service layer for the playlist bot.
//!
//! This module contains the business logic for:
//! - Link extraction from post markup (`extract_video_ids`)
//! - Thread subject matching (`SubjectMatcher`)
//! - Catalog polling and thread lifecycle (`CatalogTracker`)
//! - Tagged playlist lookup and publishing (`PlaylistResolver`)

pub mod extractor;
pub mod matcher;
mod playlists;
mod tracker;

pub use extractor::extract_video_ids;
pub use matcher::{SubjectList, SubjectMatcher, SubjectPattern};
pub use playlists::{PlaylistResolver, PublishOutcome, ResolveAction, Resolution};
pub use tracker::{CatalogTracker, PollReport, RetryPolicy};
