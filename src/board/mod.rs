//! Catalog source abstractions.
//!
//! The tracker only needs two reads from a board: the full catalog and a
//! single thread. Everything else (URL layout, transport) lives behind
//! [`BoardSource`].

pub mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CatalogPage, Thread};

// Re-export for convenience
pub use http::HttpBoard;

/// Read-only access to one board.
#[async_trait]
pub trait BoardSource: Send + Sync {
    /// Fetch every catalog page.
    ///
    /// A connection reset surfaces as [`AppError::ConnectionReset`].
    ///
    /// [`AppError::ConnectionReset`]: crate::error::AppError::ConnectionReset
    async fn fetch_catalog(&self) -> Result<Vec<CatalogPage>>;

    /// Fetch a thread by number.
    ///
    /// Threads that are gone or closed to us surface as an
    /// [`AppError::Status`] for which `is_gone()` holds.
    ///
    /// [`AppError::Status`]: crate::error::AppError::Status
    async fn fetch_thread(&self, thread_no: u64) -> Result<Thread>;
}
