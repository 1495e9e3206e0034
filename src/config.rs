//! Client configuration

use chrono::Duration;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::Dispatch;

use crate::cache::CACHE_FILE_NAME;

/// Base URL of the YouTube Data API v3
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Default time-to-live for cached responses in hours
pub const DEFAULT_CACHE_TTL_HOURS: i64 = 24;

/// Settings for a [`YoutubeApi`](crate::api::YoutubeApi) client
///
/// Only the developer key is required. The `Debug` output redacts the key.
#[derive(Clone)]
pub struct ClientConfig {
    /// Developer key sent with every request
    pub developer_key: String,
    /// Directory holding the cache file
    pub cache_dir: PathBuf,
    /// Whether responses are cached on disk
    pub caching: bool,
    /// How long a cached response stays valid
    pub cache_ttl: Duration,
    /// API base URL, ending with `/`
    pub base_url: String,
    /// Subscriber that receives the client's log events
    pub log_sink: Dispatch,
}

impl ClientConfig {
    /// Creates a configuration with default settings
    ///
    /// Caching is on with a 24 hour TTL, the cache lives in the current
    /// directory and logging goes nowhere.
    pub fn new(developer_key: impl Into<String>) -> Self {
        Self {
            developer_key: developer_key.into(),
            cache_dir: PathBuf::from("."),
            caching: true,
            cache_ttl: Duration::hours(DEFAULT_CACHE_TTL_HOURS),
            base_url: DEFAULT_BASE_URL.to_string(),
            log_sink: Dispatch::none(),
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: impl AsRef<Path>) -> Self {
        self.cache_dir = cache_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }

    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_log_sink(mut self, log_sink: Dispatch) -> Self {
        self.log_sink = log_sink;
        self
    }

    /// Full path of the cache file
    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE_NAME)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("developer_key", &redact(&self.developer_key))
            .field("cache_dir", &self.cache_dir)
            .field("caching", &self.caching)
            .field("cache_ttl", &self.cache_ttl)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Shortens a credential for log output
pub(crate) fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("key");
        assert_eq!(config.cache_dir, PathBuf::from("."));
        assert!(config.caching);
        assert_eq!(config.cache_ttl, Duration::hours(24));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.cache_file(), PathBuf::from(".").join(CACHE_FILE_NAME));
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::new("key")
            .with_cache_dir("/tmp/yt")
            .with_caching(false)
            .with_cache_ttl(Duration::minutes(5))
            .with_base_url("http://localhost/");

        assert_eq!(config.cache_file(), PathBuf::from("/tmp/yt").join(CACHE_FILE_NAME));
        assert!(!config.caching);
        assert_eq!(config.cache_ttl, Duration::minutes(5));
        assert_eq!(config.base_url, "http://localhost/");
    }

    #[test]
    fn test_debug_output_hides_key() {
        let config = ClientConfig::new("AIzaSyD-secret-developer-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-developer-key"));
        assert!(debug.contains("AIza****"));
    }

    #[test]
    fn test_redact_short_secrets_completely() {
        assert_eq!(redact("abc"), "****");
        assert_eq!(redact("12345678"), "****");
        assert_eq!(redact("123456789"), "1234****");
    }
}
