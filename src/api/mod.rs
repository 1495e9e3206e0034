//! YouTube Data API v3 request layer
//!
//! Requests flow through three pieces:
//! - a [`Transport`] performs the HTTP `GET`,
//! - a [`RawExecutor`] adds the developer key and turns error bodies into
//!   [`ApiError::Upstream`],
//! - a [`CachedExecutor`] sits in front of the raw executor and answers
//!   repeated requests from the on-disk [`CacheStore`](crate::cache::CacheStore).
//!
//! [`YoutubeApi`] builds endpoint parameters on top of that and drives the
//! [`collect_all`] and [`collect_in_batches`] loops that assemble complete
//! result sets.

pub mod client;
pub mod executor;
pub mod paging;
pub mod params;
pub mod transport;

pub use client::{YoutubeApi, MAX_IDS_PER_REQUEST};
pub use executor::{request_fingerprint, CachedExecutor, RawExecutor, CREDENTIAL_PARAM};
pub use paging::{collect_all, collect_in_batches, Page};
pub use params::{EventType, LookupParams, QueryParams, SearchOrder, SearchParams, VideoDuration};
pub use transport::{HttpTransport, RawResponse, Transport};

use thiserror::Error;

use crate::cache::CacheError;

/// Errors that can occur when talking to the YouTube API
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// A non-reqwest transport failed to complete the request
    #[error("Transport failed: {0}")]
    Transport(String),

    /// The API answered, but the response reports an error
    #[error("YouTube API error: {message}")]
    Upstream {
        /// HTTP-style status code reported by the API, if any
        code: Option<u16>,
        /// Message reported by the API
        message: String,
    },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// A field is present but does not hold the expected kind of value
    #[error("Invalid value for field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// The API returned no channel for the requested id
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    /// Writing the request cache failed
    #[error(transparent)]
    Cache(#[from] CacheError),
}
