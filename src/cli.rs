//! Command-line interface parsing for video-finder
//!
//! Maps command-line flags onto a [`ClientConfig`] and search flags onto
//! [`SearchParams`].

use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

use crate::api::{EventType, SearchOrder, SearchParams, VideoDuration};
use crate::config::{ClientConfig, DEFAULT_CACHE_TTL_HOURS};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The timestamp is neither RFC 3339 nor a plain date
    #[error("Invalid timestamp: '{0}'. Use RFC 3339 (2024-07-15T05:30:00Z) or a date (2024-07-15)")]
    InvalidTimestamp(String),
}

/// video-finder - search YouTube videos and look up channels
#[derive(Parser, Debug)]
#[command(name = "video-finder")]
#[command(about = "Search YouTube videos and look up channels, with an on-disk response cache")]
#[command(version)]
pub struct Cli {
    /// YouTube Data API developer key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub key: String,

    /// Directory for the response cache [default: the platform cache directory]
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Always call the API, never read or write the cache
    #[arg(long)]
    pub no_cache: bool,

    /// How long cached responses stay valid
    #[arg(long, value_name = "HOURS", default_value_t = DEFAULT_CACHE_TTL_HOURS as u32)]
    pub cache_ttl_hours: u32,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log more (-v for requests, -vv for cache details)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for videos
    Search(SearchArgs),
    /// Look up channels by id
    Channels {
        #[arg(required = true, value_name = "CHANNEL_ID")]
        ids: Vec<String>,
    },
    /// Look up videos by id
    Videos {
        #[arg(required = true, value_name = "VIDEO_ID")]
        ids: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search terms
    #[arg(short, long)]
    pub query: Option<String>,

    /// Only videos from this channel
    #[arg(long)]
    pub channel_id: Option<String>,

    #[arg(long, value_enum)]
    pub duration: Option<VideoDuration>,

    #[arg(long, value_enum)]
    pub event_type: Option<EventType>,

    #[arg(long, value_enum, default_value_t = SearchOrder::Date)]
    pub order: SearchOrder,

    /// Only videos published at or after this time
    #[arg(long, value_parser = parse_timestamp)]
    pub published_after: Option<DateTime<Utc>>,

    /// Only videos published before this time
    #[arg(long, value_parser = parse_timestamp)]
    pub published_before: Option<DateTime<Utc>>,

    /// Fetch full video details (adds durations, costs extra requests)
    #[arg(long)]
    pub details: bool,
}

impl SearchArgs {
    pub fn to_params(&self) -> SearchParams {
        SearchParams {
            order: self.order,
            query: self.query.clone(),
            channel_id: self.channel_id.clone(),
            published_after: self.published_after,
            published_before: self.published_before,
            duration: self.duration,
            event_type: self.event_type,
            ..SearchParams::default()
        }
    }
}

impl Cli {
    /// Builds the client configuration from the parsed flags
    pub fn client_config(&self) -> ClientConfig {
        let cache_dir = self.cache_dir.clone().unwrap_or_else(default_cache_dir);
        ClientConfig::new(&self.key)
            .with_cache_dir(cache_dir)
            .with_caching(!self.no_cache)
            .with_cache_ttl(Duration::hours(i64::from(self.cache_ttl_hours)))
    }
}

/// Platform cache directory (`~/.cache/video-finder/` on Linux), or `.`
pub fn default_cache_dir() -> PathBuf {
    ProjectDirs::from("", "", "video-finder")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Parses an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC)
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CliError::InvalidTimestamp(s.to_string()))
}
