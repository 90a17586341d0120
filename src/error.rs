// src/error.rs

//! Unified error handling for the scraper and playlist publisher.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use thiserror::Error;

use crate::utils::tag::TagError;

/// Result type alias for mutube operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Peer reset the connection; worth retrying after a cooldown
    #[error("Connection reset: {0}")]
    ConnectionReset(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Subject pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// Playlist tag could not be encoded or decoded
    #[error("Tag error: {0}")]
    Tag(#[from] TagError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Video platform returned something unusable
    #[error("Platform error for {context}: {message}")]
    Platform { context: String, message: String },

    /// A pause was interrupted by shutdown
    #[error("Cancelled")]
    Cancelled,
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a platform error with context.
    pub fn platform(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Platform {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a status error.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Classify a transport error, singling out connection resets.
    pub fn from_transport(error: reqwest::Error) -> Self {
        let mut source = error.source();
        while let Some(inner) = source {
            if let Some(io_err) = inner.downcast_ref::<io::Error>() {
                if io_err.kind() == io::ErrorKind::ConnectionReset {
                    return Self::ConnectionReset(error.to_string());
                }
            }
            source = inner.source();
        }
        Self::Http(error)
    }

    /// The resource is gone or closed to us (404, 403, 410).
    pub fn is_gone(&self) -> bool {
        matches!(self, Self::Status { status: 403 | 404 | 410, .. })
    }

    /// The resource does not exist (404).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Failure expected to clear up on its own.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionReset(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(AppError::status("u", 404).is_gone());
        assert!(AppError::status("u", 403).is_gone());
        assert!(AppError::status("u", 404).is_not_found());
        assert!(!AppError::status("u", 403).is_not_found());
        assert!(!AppError::status("u", 500).is_gone());
    }

    #[test]
    fn test_transient_only_for_resets() {
        assert!(AppError::ConnectionReset("peer".into()).is_transient());
        assert!(!AppError::status("u", 503).is_transient());
        assert!(!AppError::Cancelled.is_transient());
    }

    #[test]
    fn test_display() {
        let err = AppError::status("https://a.4cdn.org/mu/thread/1.json", 404);
        assert_eq!(
            err.to_string(),
            "HTTP 404 from https://a.4cdn.org/mu/thread/1.json"
        );
    }
}
