//! Canonical video identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of every canonical identifier.
pub const VIDEO_ID_LEN: usize = 11;

/// A canonical video identifier, e.g. `_lOT2p_FCvA`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Take the canonical identifier from the start of `raw`.
    ///
    /// Identifiers are exactly eleven characters of `[A-Za-z0-9_-]`; anything
    /// trailing them (a glued word, `&t=30`) is dropped. Returns `None` when
    /// fewer than eleven such characters lead the input.
    pub fn parse_prefix(raw: &str) -> Option<Self> {
        let id: String = raw
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .take(VIDEO_ID_LEN)
            .collect();
        (id.len() == VIDEO_ID_LEN).then_some(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl From<&str> for VideoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for VideoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefix() {
        assert_eq!(
            VideoId::parse_prefix("_lOT2p_FCvA").map(|v| v.to_string()),
            Some("_lOT2p_FCvA".to_string())
        );
        assert_eq!(
            VideoId::parse_prefix("_lOT2p_FCvAout").map(|v| v.to_string()),
            Some("_lOT2p_FCvA".to_string())
        );
        assert_eq!(VideoId::parse_prefix("short"), None);
        assert_eq!(VideoId::parse_prefix("abc?def=ghijkl"), None);
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            VideoId::from("_lOT2p_FCvA").watch_url(),
            "https://www.youtube.com/watch?v=_lOT2p_FCvA"
        );
    }
}
