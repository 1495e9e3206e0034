//! High-level lookups that return domain objects

use crate::api::{ApiError, HttpTransport, SearchParams, Transport, YoutubeApi};
use crate::config::ClientConfig;

use super::fields::{resolve_str, search_result};
use super::{YoutubeChannel, YoutubeVideo};

/// Parts requested for channel lookups
const CHANNEL_PARTS: &str = "snippet,contentDetails";

/// Parts requested for video lookups
const VIDEO_PARTS: &str = "snippet,contentDetails";

/// Finds videos and channels, paging and batching as needed
#[derive(Debug)]
pub struct YoutubeFinder<T = HttpTransport> {
    api: YoutubeApi<T>,
}

impl YoutubeFinder<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::with_api(YoutubeApi::new(config)?))
    }
}

impl<T: Transport> YoutubeFinder<T> {
    pub fn with_api(api: YoutubeApi<T>) -> Self {
        Self { api }
    }

    /// Channel details for every id the API knows
    ///
    /// Unknown ids are silently absent from the result.
    pub fn get_channels<S: AsRef<str>>(
        &mut self,
        ids: &[S],
    ) -> Result<Vec<YoutubeChannel>, ApiError> {
        self.api
            .channels_all(ids, CHANNEL_PARTS)?
            .iter()
            .map(YoutubeChannel::from_channel_item)
            .collect()
    }

    /// Details of a single channel
    ///
    /// # Returns
    /// * `Err(ApiError::ChannelNotFound)` if the API returns no such channel
    pub fn get_channel(&mut self, id: &str) -> Result<YoutubeChannel, ApiError> {
        self.get_channels(&[id])?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::ChannelNotFound(id.to_string()))
    }

    /// Videos matching `filter`, built from search snippets alone
    ///
    /// Cheaper than [`get_videos`](Self::get_videos) but leaves
    /// [`YoutubeVideo::duration`] unset.
    pub fn search_videos(&mut self, filter: &SearchParams) -> Result<Vec<YoutubeVideo>, ApiError> {
        let params = filter.clone().with_part("snippet");
        self.api
            .search_all(&params)?
            .iter()
            .map(YoutubeVideo::from_search_item)
            .collect()
    }

    /// Videos matching `filter`, with full details
    ///
    /// Searches for ids only, then fetches the matching videos in batches.
    pub fn get_videos(&mut self, filter: &SearchParams) -> Result<Vec<YoutubeVideo>, ApiError> {
        let params = filter.clone().with_part("id");
        let hits = self.api.search_all(&params)?;
        let ids = hits
            .iter()
            .map(|hit| resolve_str(search_result::VIDEO_ID, hit))
            .collect::<Result<Vec<_>, _>>()?;
        self.get_videos_by_id(&ids)
    }

    /// Full details for the given video ids
    pub fn get_videos_by_id<S: AsRef<str>>(
        &mut self,
        ids: &[S],
    ) -> Result<Vec<YoutubeVideo>, ApiError> {
        self.api
            .videos_all(ids, VIDEO_PARTS)?
            .iter()
            .map(YoutubeVideo::from_video_item)
            .collect()
    }

    pub fn api(&self) -> &YoutubeApi<T> {
        &self.api
    }
}
