//! Application configuration structures.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::tag::TagFormat;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Which board to watch and which threads on it
    #[serde(default)]
    pub board: BoardConfig,

    /// Playlist series settings
    #[serde(default)]
    pub playlist: PlaylistConfig,

    /// Pacing and retry intervals
    #[serde(default)]
    pub timing: TimingConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Video platform API settings
    #[serde(default)]
    pub platform: PlatformConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Tag format for the configured playlist series.
    pub fn tag_format(&self) -> Result<TagFormat> {
        Ok(TagFormat::new(
            &self.playlist.prefix,
            &self.playlist.time_format,
        )?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.board.name.trim().is_empty() {
            return Err(AppError::validation("board.name is empty"));
        }
        if self.board.api_base.trim().is_empty() {
            return Err(AppError::validation("board.api_base is empty"));
        }
        if let MatcherConfig::Pattern(pattern) = &self.board.matcher {
            regex::Regex::new(pattern)?;
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.platform.access_token_env.trim().is_empty() {
            return Err(AppError::validation("platform.access_token_env is empty"));
        }
        self.tag_format()
            .map_err(|e| AppError::validation(format!("playlist tag: {e}")))?;
        Ok(())
    }
}

/// Board and thread selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Abbreviated board name, e.g. `mu`
    #[serde(default = "defaults::board")]
    pub name: String,

    /// Read-only JSON API root
    #[serde(default = "defaults::board_api")]
    pub api_base: String,

    /// Posting names whose comments are skipped
    #[serde(default)]
    pub ignored_names: Vec<String>,

    /// Which catalog threads get watched
    #[serde(default)]
    pub matcher: MatcherConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: defaults::board(),
            api_base: defaults::board_api(),
            ignored_names: Vec::new(),
            matcher: MatcherConfig::default(),
        }
    }
}

/// Thread subject matching rule.
///
/// ```toml
/// matcher = { subjects = ["/daily/", "daily general"] }
/// matcher = { pattern = "^/metal/" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherConfig {
    /// Case-insensitive whole-subject membership
    Subjects(Vec<String>),
    /// Case-insensitive regular expression
    Pattern(String),
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self::Subjects(defaults::subjects())
    }
}

/// Playlist series settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistConfig {
    /// Series prefix inside the tag
    #[serde(default = "defaults::prefix")]
    pub prefix: String,

    /// strftime-style format deciding the bucket size
    #[serde(default = "defaults::time_format")]
    pub time_format: String,

    /// Free text appended after the tag in new playlist titles
    #[serde(default)]
    pub title_suffix: String,

    /// Deduplicate against the current playlist only
    #[serde(default = "defaults::current_only")]
    pub current_only: bool,
}

impl PlaylistConfig {
    /// Title for a new playlist carrying `tag`.
    pub fn title_for(&self, tag: &str) -> String {
        let suffix = self.title_suffix.trim();
        if suffix.is_empty() {
            tag.to_string()
        } else {
            format!("{tag} {suffix}")
        }
    }
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            prefix: defaults::prefix(),
            time_format: defaults::time_format(),
            title_suffix: String::new(),
            current_only: defaults::current_only(),
        }
    }
}

/// Pacing and retry intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Pause after every publish attempt
    #[serde(default = "defaults::publish_pause")]
    pub publish_pause_secs: u64,

    /// Pause between poll cycles
    #[serde(default = "defaults::poll_pause")]
    pub poll_pause_secs: u64,

    /// Wait before refetching the catalog after a connection reset
    #[serde(default = "defaults::reset_cooldown")]
    pub reset_cooldown_secs: u64,

    /// Give up after this many resets in a row (0 = never)
    #[serde(default)]
    pub reset_retry_limit: u32,
}

impl TimingConfig {
    pub fn publish_pause(&self) -> Duration {
        Duration::from_secs(self.publish_pause_secs)
    }

    pub fn poll_pause(&self) -> Duration {
        Duration::from_secs(self.poll_pause_secs)
    }

    pub fn reset_cooldown(&self) -> Duration {
        Duration::from_secs(self.reset_cooldown_secs)
    }

    pub fn retry_limit(&self) -> Option<u32> {
        (self.reset_retry_limit > 0).then_some(self.reset_retry_limit)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            publish_pause_secs: defaults::publish_pause(),
            poll_pause_secs: defaults::poll_pause(),
            reset_cooldown_secs: defaults::reset_cooldown(),
            reset_retry_limit: 0,
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Video platform API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// REST API root
    #[serde(default = "defaults::platform_api")]
    pub api_base: String,

    /// Environment variable holding the OAuth access token
    #[serde(default = "defaults::access_token_env")]
    pub access_token_env: String,
}

impl PlatformConfig {
    /// Read the access token from the environment.
    pub fn access_token(&self) -> Result<String> {
        env::var(&self.access_token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                AppError::config(format!(
                    "access token not set; export {}",
                    self.access_token_env
                ))
            })
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::platform_api(),
            access_token_env: defaults::access_token_env(),
        }
    }
}

mod defaults {
    // Board defaults
    pub fn board() -> String {
        "mu".into()
    }
    pub fn board_api() -> String {
        "https://a.4cdn.org".into()
    }
    pub fn subjects() -> Vec<String> {
        vec!["/daily/".into()]
    }

    // Playlist defaults
    pub fn prefix() -> String {
        "daylist".into()
    }
    pub fn time_format() -> String {
        "%A %d.%m.%Y".into()
    }
    pub fn current_only() -> bool {
        true
    }

    // Timing defaults
    pub fn publish_pause() -> u64 {
        60
    }
    pub fn poll_pause() -> u64 {
        600
    }
    pub fn reset_cooldown() -> u64 {
        300
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; mutube/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Platform defaults
    pub fn platform_api() -> String {
        "https://www.googleapis.com/youtube/v3".into()
    }
    pub fn access_token_env() -> String {
        "MUTUBE_ACCESS_TOKEN".into()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_board() {
        let mut config = Config::default();
        config.board.name = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_separator_in_prefix() {
        let mut config = Config::default();
        config.playlist.prefix = "day:list".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_clock_format() {
        let mut config = Config::default();
        config.playlist.time_format = "%H:%M".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_pattern() {
        let mut config = Config::default();
        config.board.matcher = MatcherConfig::Pattern("(unclosed".to_string());
        assert!(matches!(config.validate(), Err(AppError::Regex(_))));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn retry_limit_zero_means_unbounded() {
        let mut timing = TimingConfig::default();
        assert_eq!(timing.retry_limit(), None);
        timing.reset_retry_limit = 3;
        assert_eq!(timing.retry_limit(), Some(3));
        assert_eq!(timing.reset_cooldown(), Duration::from_secs(300));
    }

    #[test]
    fn title_for_appends_suffix() {
        let mut playlist = PlaylistConfig::default();
        assert_eq!(playlist.title_for("[a:b]"), "[a:b]");
        playlist.title_suffix = "/daily/ links".to_string();
        assert_eq!(playlist.title_for("[a:b]"), "[a:b] /daily/ links");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[board]
name = "mu"
matcher = {{ pattern = "^/metal/" }}
ignored_names = ["Tinytrip"]

[playlist]
prefix = '\m/'
time_format = "%b %Y"
current_only = false

[timing]
publish_pause_secs = 1
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.board.matcher, MatcherConfig::Pattern("^/metal/".into()));
        assert_eq!(config.board.ignored_names, vec!["Tinytrip".to_string()]);
        assert_eq!(config.playlist.prefix, r"\m/");
        assert!(!config.playlist.current_only);
        assert_eq!(config.timing.publish_pause_secs, 1);
        assert_eq!(config.timing.poll_pause_secs, 600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_or_default_falls_back() {
        let config = Config::load_or_default("/nonexistent/mutube.toml");
        assert_eq!(config.board.name, "mu");
        assert_eq!(
            config.board.matcher,
            MatcherConfig::Subjects(vec!["/daily/".into()])
        );
    }
}
