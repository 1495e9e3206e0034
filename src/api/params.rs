//! Query parameters for the `search`, `channels` and `videos` endpoints

use chrono::{DateTime, SecondsFormat, Utc};
use clap::ValueEnum;
use std::collections::BTreeMap;
use std::fmt;

/// Query parameters of one request, keyed by API parameter name
pub type QueryParams = BTreeMap<String, String>;

/// Default page size; also the API's maximum
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Sort order of search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SearchOrder {
    #[default]
    Date,
    Rating,
    Relevance,
    Title,
    VideoCount,
    ViewCount,
}

impl fmt::Display for SearchOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Date => "date",
            Self::Rating => "rating",
            Self::Relevance => "relevance",
            Self::Title => "title",
            Self::VideoCount => "videoCount",
            Self::ViewCount => "viewCount",
        })
    }
}

/// Video length filter (`videoDuration`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VideoDuration {
    Any,
    /// Longer than 20 minutes
    Long,
    /// Between 4 and 20 minutes
    Medium,
    /// Shorter than 4 minutes
    Short,
}

impl fmt::Display for VideoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::Long => "long",
            Self::Medium => "medium",
            Self::Short => "short",
        })
    }
}

/// Broadcast filter (`eventType`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventType {
    Completed,
    Live,
    Upcoming,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Completed => "completed",
            Self::Live => "live",
            Self::Upcoming => "upcoming",
        })
    }
}

/// Parameters of a `search.list` request
///
/// `part`, `order`, `maxResults` and `type` are always sent. Every other
/// parameter is only sent when set.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub part: String,
    pub order: SearchOrder,
    pub max_results: u32,
    /// Resource type to search for (`type`)
    pub kind: String,
    pub query: Option<String>,
    pub channel_id: Option<String>,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
    pub duration: Option<VideoDuration>,
    pub event_type: Option<EventType>,
    pub page_token: Option<String>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            part: "snippet".to_string(),
            order: SearchOrder::default(),
            max_results: DEFAULT_MAX_RESULTS,
            kind: "video".to_string(),
            query: None,
            channel_id: None,
            published_after: None,
            published_before: None,
            duration: None,
            event_type: None,
            page_token: None,
        }
    }
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_part(mut self, part: impl Into<String>) -> Self {
        self.part = part.into();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn with_order(mut self, order: SearchOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_duration(mut self, duration: VideoDuration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn published_after(mut self, at: DateTime<Utc>) -> Self {
        self.published_after = Some(at);
        self
    }

    pub fn published_before(mut self, at: DateTime<Utc>) -> Self {
        self.published_before = Some(at);
        self
    }

    pub fn with_page_token(mut self, token: Option<&str>) -> Self {
        self.page_token = token.map(String::from);
        self
    }

    /// Converts to the wire parameters, omitting empty optional values
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert("part".into(), self.part.clone());
        params.insert("order".into(), self.order.to_string());
        params.insert("maxResults".into(), self.max_results.to_string());
        params.insert("type".into(), self.kind.clone());

        insert_non_empty(&mut params, "q", self.query.as_deref());
        insert_non_empty(&mut params, "channelId", self.channel_id.as_deref());
        insert_non_empty(&mut params, "pageToken", self.page_token.as_deref());
        if let Some(at) = self.published_after {
            params.insert("publishedAfter".into(), format_timestamp(at));
        }
        if let Some(at) = self.published_before {
            params.insert("publishedBefore".into(), format_timestamp(at));
        }
        if let Some(duration) = self.duration {
            params.insert("videoDuration".into(), duration.to_string());
        }
        if let Some(event_type) = self.event_type {
            params.insert("eventType".into(), event_type.to_string());
        }
        params
    }
}

/// Parameters of a `channels.list` or `videos.list` lookup by id
#[derive(Debug, Clone, PartialEq)]
pub struct LookupParams {
    pub ids: Vec<String>,
    pub part: String,
    pub max_results: u32,
    pub page_token: Option<String>,
}

impl LookupParams {
    /// Channel lookup with the `snippet` part
    pub fn channels<S: AsRef<str>>(ids: &[S]) -> Self {
        Self::with_part(ids, "snippet")
    }

    /// Video lookup with the `snippet` and `contentDetails` parts
    pub fn videos<S: AsRef<str>>(ids: &[S]) -> Self {
        Self::with_part(ids, "snippet,contentDetails")
    }

    pub fn with_part<S: AsRef<str>>(ids: &[S], part: impl Into<String>) -> Self {
        Self {
            ids: ids.iter().map(|id| id.as_ref().to_string()).collect(),
            part: part.into(),
            max_results: DEFAULT_MAX_RESULTS,
            page_token: None,
        }
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }

    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert("part".into(), self.part.clone());
        params.insert("maxResults".into(), self.max_results.to_string());
        params.insert("id".into(), self.ids.join(","));
        insert_non_empty(&mut params, "pageToken", self.page_token.as_deref());
        params
    }
}

fn insert_non_empty(params: &mut QueryParams, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        params.insert(key.to_string(), value.to_string());
    }
}

/// RFC 3339 with a `Z` suffix, the form the API expects
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
