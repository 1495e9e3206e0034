//! YouTube video finder library
//!
//! A blocking client for the YouTube Data API v3 `search`, `channels` and
//! `videos` endpoints. Responses are cached in a single file on disk, list
//! endpoints are paged through automatically and id lookups are split into
//! batches the API accepts.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;

pub use api::{ApiError, SearchParams, YoutubeApi};
pub use config::ClientConfig;
pub use data::{YoutubeChannel, YoutubeFinder, YoutubeVideo};
