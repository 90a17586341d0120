//! Utility functions and helpers.

pub mod http;
pub mod tag;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};

/// Sleep for `duration` unless `cancel` fires first.
///
/// Returns [`AppError::Cancelled`] when interrupted so callers can bail out
/// with `?`.
pub async fn pause(cancel: &CancellationToken, duration: Duration) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(AppError::Cancelled);
    }
    if duration.is_zero() {
        return Ok(());
    }
    tokio::select! {
        () = cancel.cancelled() => Err(AppError::Cancelled),
        () = tokio::time::sleep(duration) => Ok(()),
    }
}
