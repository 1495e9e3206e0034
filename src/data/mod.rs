//! Domain models for YouTube videos and channels
//!
//! Raw API items are converted into [`YoutubeVideo`] and [`YoutubeChannel`]
//! through the field paths in [`fields`]. [`YoutubeFinder`] ties the API
//! client and the conversions together.

pub mod fields;
pub mod finder;

pub use finder::YoutubeFinder;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::api::ApiError;
use fields::{channel, resolve_str, search_result, snippet, video, FieldPath};

/// Base of the watch URL built by [`YoutubeVideo::url`]
pub const VIDEO_URL_BASE: &str = "http://youtube.de/watch?v=";

/// Whether a video is, or will be, a live broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveBroadcastContent {
    /// Regular upload or finished broadcast
    None,
    Live,
    Upcoming,
}

impl LiveBroadcastContent {
    /// Parses the API's `liveBroadcastContent` value
    pub fn from_api(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "live" => Some(Self::Live),
            "upcoming" => Some(Self::Upcoming),
            _ => None,
        }
    }
}

/// A YouTube video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoutubeVideo {
    pub title: String,
    pub description: String,
    /// Medium-size thumbnail
    pub image_url: String,
    pub video_id: String,
    /// ISO 8601 duration such as `PT4M13S`; only known for `videos.list` items
    pub duration: Option<String>,
    pub published_at: DateTime<Utc>,
    pub live_broadcast: LiveBroadcastContent,
    pub channel_id: String,
}

impl YoutubeVideo {
    /// Builds a video from a `search.list` result (`part=snippet`)
    pub fn from_search_item(item: &Value) -> Result<Self, ApiError> {
        Self::from_item(item, search_result::VIDEO_ID, None)
    }

    /// Builds a video from a `videos.list` resource (`part=snippet,contentDetails`)
    pub fn from_video_item(item: &Value) -> Result<Self, ApiError> {
        let duration = resolve_str(video::DURATION, item)?.to_string();
        Self::from_item(item, video::ID, Some(duration))
    }

    fn from_item(
        item: &Value,
        id_path: FieldPath,
        duration: Option<String>,
    ) -> Result<Self, ApiError> {
        let live = resolve_str(snippet::LIVE_BROADCAST, item)?;
        let live_broadcast =
            LiveBroadcastContent::from_api(live).ok_or_else(|| ApiError::InvalidField {
                field: snippet::LIVE_BROADCAST.join("."),
                reason: format!("unknown value {live:?}"),
            })?;

        Ok(Self {
            title: resolve_str(snippet::TITLE, item)?.to_string(),
            description: resolve_str(snippet::DESCRIPTION, item)?.to_string(),
            image_url: resolve_str(snippet::THUMBNAIL_URL, item)?.to_string(),
            video_id: resolve_str(id_path, item)?.to_string(),
            duration,
            published_at: parse_timestamp(snippet::PUBLISHED_AT, item)?,
            live_broadcast,
            channel_id: resolve_str(snippet::CHANNEL_ID, item)?.to_string(),
        })
    }

    /// Watch URL of the video
    pub fn url(&self) -> String {
        format!("{}{}", VIDEO_URL_BASE, self.video_id)
    }
}

/// A YouTube channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoutubeChannel {
    pub title: String,
    pub description: String,
    pub channel_id: String,
    /// Medium-size channel thumbnail
    pub image: String,
}

impl YoutubeChannel {
    /// Builds a channel from a `channels.list` resource
    pub fn from_channel_item(item: &Value) -> Result<Self, ApiError> {
        Ok(Self {
            title: resolve_str(snippet::TITLE, item)?.to_string(),
            description: resolve_str(snippet::DESCRIPTION, item)?.to_string(),
            channel_id: resolve_str(channel::ID, item)?.to_string(),
            image: resolve_str(snippet::THUMBNAIL_URL, item)?.to_string(),
        })
    }
}

fn parse_timestamp(path: FieldPath, item: &Value) -> Result<DateTime<Utc>, ApiError> {
    let raw = resolve_str(path, item)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ApiError::InvalidField {
            field: path.join("."),
            reason: format!("{raw:?} is not an RFC 3339 timestamp: {e}"),
        })
}
