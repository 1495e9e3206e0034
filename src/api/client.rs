//! Endpoint-level YouTube API client

use serde_json::Value;
use std::num::NonZeroUsize;
use tracing::Dispatch;

use super::executor::{request_fingerprint, CachedExecutor, RawExecutor};
use super::paging::{collect_all, collect_in_batches, Page};
use super::params::{LookupParams, QueryParams, SearchParams};
use super::transport::{HttpTransport, Transport};
use super::ApiError;
use crate::cache::{CacheEntry, CacheStore};
use crate::config::ClientConfig;

/// Most ids the `channels` and `videos` endpoints accept in one request
pub const MAX_IDS_PER_REQUEST: NonZeroUsize = match NonZeroUsize::new(50) {
    Some(n) => n,
    None => unreachable!(),
};

/// Client for the `search`, `channels` and `videos` endpoints
///
/// Every request goes through a [`CachedExecutor`], so repeated calls with the
/// same parameters are answered from disk until the cache entry expires. All
/// logging happens under the sink given in [`ClientConfig::log_sink`].
#[derive(Debug)]
pub struct YoutubeApi<T = HttpTransport> {
    executor: CachedExecutor<T>,
    log_sink: Dispatch,
}

impl YoutubeApi<HttpTransport> {
    /// Creates a client that talks to the API over HTTP
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }
}

impl<T: Transport> YoutubeApi<T> {
    /// Creates a client on top of a custom transport
    ///
    /// When caching is enabled the cache file is loaded here; a missing or
    /// damaged file gives an empty cache.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let ClientConfig {
            developer_key,
            caching,
            cache_ttl,
            base_url,
            log_sink,
            ..
        } = &config;

        let cache = tracing::dispatcher::with_default(log_sink, || {
            caching.then(|| CacheStore::load_or_empty(config.cache_file(), *cache_ttl))
        });
        let raw = RawExecutor::new(transport, base_url.clone(), developer_key.clone());

        Self {
            executor: CachedExecutor::new(raw, cache),
            log_sink: log_sink.clone(),
        }
    }

    /// One page of `search.list`
    pub fn search(&mut self, params: &SearchParams) -> Result<Value, ApiError> {
        self.logged(|api| api.request("search", &params.to_query()))
    }

    /// One page of `channels.list`
    pub fn channels(&mut self, params: &LookupParams) -> Result<Value, ApiError> {
        self.logged(|api| api.request("channels", &params.to_query()))
    }

    /// One page of `videos.list`
    pub fn videos(&mut self, params: &LookupParams) -> Result<Value, ApiError> {
        self.logged(|api| api.request("videos", &params.to_query()))
    }

    /// All `search.list` items across every page
    ///
    /// Paging always starts at the first page; `params.page_token` is ignored.
    pub fn search_all(&mut self, params: &SearchParams) -> Result<Vec<Value>, ApiError> {
        self.logged(|api| {
            tracing::info!("fetching all search results");
            let items = collect_all(|token| {
                let page_params = params.clone().with_page_token(token);
                Page::from_response(api.request("search", &page_params.to_query())?)
            })?;
            tracing::info!(count = items.len(), "fetched all search results");
            Ok(items)
        })
    }

    /// All `channels.list` items for `ids`, 50 ids per request
    pub fn channels_all<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        part: &str,
    ) -> Result<Vec<Value>, ApiError> {
        self.logged(|api| api.lookup_all("channels", ids, part))
    }

    /// All `videos.list` items for `ids`, 50 ids per request
    pub fn videos_all<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        part: &str,
    ) -> Result<Vec<Value>, ApiError> {
        self.logged(|api| api.lookup_all("videos", ids, part))
    }

    /// The request cache, if caching is enabled
    pub fn cache(&self) -> Option<&CacheStore> {
        self.executor.cache()
    }

    /// Looks up the cache entry for a request without touching the network
    pub fn cached_entry(&self, method: &str, params: &QueryParams) -> Option<&CacheEntry> {
        let fp = request_fingerprint(method, params);
        self.cache()?.entry(&fp)
    }

    pub fn transport(&self) -> &T {
        self.executor.raw().transport()
    }

    fn lookup_all<S: AsRef<str>>(
        &mut self,
        method: &str,
        ids: &[S],
        part: &str,
    ) -> Result<Vec<Value>, ApiError> {
        tracing::info!(method, ids = ids.len(), "fetching items by id");
        collect_in_batches(ids, MAX_IDS_PER_REQUEST, |window| {
            let params = LookupParams::with_part(window, part);
            Ok(Page::from_response(self.request(method, &params.to_query())?)?.items)
        })
    }

    fn request(&mut self, method: &str, params: &QueryParams) -> Result<Value, ApiError> {
        self.executor.request(method, params)
    }

    /// Runs `f` with the injected log sink as the active subscriber
    fn logged<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let sink = self.log_sink.clone();
        tracing::dispatcher::with_default(&sink, || f(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RawResponse;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;
    use tempfile::TempDir;

    type Log = Rc<RefCell<Vec<BTreeMap<String, String>>>>;

    /// Serves `search` pages keyed by page token and echoes `videos` ids back
    struct FakeYoutube {
        log: Log,
        pages: BTreeMap<String, Value>,
    }

    impl Transport for FakeYoutube {
        fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, ApiError> {
            let query: BTreeMap<String, String> = query.iter().cloned().collect();
            self.log.borrow_mut().push(query.clone());

            let body = if url.ends_with("/search") {
                let token = query.get("pageToken").cloned().unwrap_or_default();
                self.pages.get(&token).cloned().unwrap_or(json!({"items": []}))
            } else {
                let items: Vec<Value> = query["id"]
                    .split(',')
                    .map(|id| json!({"id": id}))
                    .collect();
                json!({"items": items})
            };
            Ok(RawResponse::new(200, body.to_string()))
        }
    }

    fn fake(pages: &[(&str, Value)]) -> (FakeYoutube, Log) {
        let log = Log::default();
        let transport = FakeYoutube {
            log: Rc::clone(&log),
            pages: pages
                .iter()
                .map(|(token, body)| (token.to_string(), body.clone()))
                .collect(),
        };
        (transport, log)
    }

    fn config(dir: &TempDir) -> ClientConfig {
        ClientConfig::new("fake-dev-key")
            .with_cache_dir(dir.path())
            .with_base_url("https://example.test/youtube/v3/")
    }

    #[test]
    fn test_search_all_follows_page_tokens() {
        let temp_dir = TempDir::new().unwrap();
        let (transport, log) = fake(&[
            ("", json!({"items": [1, 2], "nextPageToken": "p2"})),
            ("p2", json!({"items": [3]})),
        ]);
        let mut api = YoutubeApi::with_transport(config(&temp_dir), transport);

        let items = api
            .search_all(&SearchParams::new().with_query("rust"))
            .unwrap();

        assert_eq!(items, vec![json!(1), json!(2), json!(3)]);
        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert!(!log[0].contains_key("pageToken"));
        assert_eq!(log[1]["pageToken"], "p2");
        assert!(log.iter().all(|q| q["q"] == "rust" && q["key"] == "fake-dev-key"));
    }

    #[test]
    fn test_search_all_is_served_from_cache_the_second_time() {
        let temp_dir = TempDir::new().unwrap();
        let (transport, log) = fake(&[("", json!({"items": ["a"], "nextPageToken": "p2"}))]);
        let mut api = YoutubeApi::with_transport(config(&temp_dir), transport);
        let params = SearchParams::new().with_channel_id("UC1");

        let first = api.search_all(&params).unwrap();
        let second = api.search_all(&params).unwrap();

        assert_eq!(first, second);
        // page one plus the empty page two, each fetched once
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(api.cache().map(CacheStore::len), Some(2));
    }

    #[test]
    fn test_videos_all_batches_ids() {
        let temp_dir = TempDir::new().unwrap();
        let (transport, log) = fake(&[]);
        let mut api = YoutubeApi::with_transport(config(&temp_dir), transport);
        let ids: Vec<String> = (0..125).map(|i| format!("v{i}")).collect();

        let items = api.videos_all(&ids, "snippet,contentDetails").unwrap();

        assert_eq!(items.len(), 125);
        assert_eq!(items[0]["id"], "v0");
        assert_eq!(items[124]["id"], "v124");
        let sizes: Vec<usize> = log
            .borrow()
            .iter()
            .map(|q| q["id"].split(',').count())
            .collect();
        assert_eq!(sizes, vec![50, 50, 25]);
        assert!(log.borrow().iter().all(|q| q["part"] == "snippet,contentDetails"));
    }

    #[test]
    fn test_channels_all_with_no_ids_makes_no_requests() {
        let temp_dir = TempDir::new().unwrap();
        let (transport, log) = fake(&[]);
        let mut api = YoutubeApi::with_transport(config(&temp_dir), transport);

        let items = api.channels_all::<&str>(&[], "snippet").unwrap();

        assert!(items.is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_single_page_requests_use_endpoint_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let (transport, log) = fake(&[]);
        let mut api =
            YoutubeApi::with_transport(config(&temp_dir).with_caching(false), transport);

        api.channels(&LookupParams::channels(&["UCa", "UCb"])).unwrap();

        let log = log.borrow();
        assert_eq!(log[0]["part"], "snippet");
        assert_eq!(log[0]["maxResults"], "50");
        assert_eq!(log[0]["id"], "UCa,UCb");
        assert!(api.cache().is_none());
    }

    #[test]
    fn test_cached_entry_is_keyed_without_credential() {
        let temp_dir = TempDir::new().unwrap();
        let (transport, _log) = fake(&[]);
        let mut api = YoutubeApi::with_transport(config(&temp_dir), transport);
        let params = LookupParams::videos(&["abc"]);

        api.videos(&params).unwrap();

        assert!(api.cached_entry("videos", &params.to_query()).is_some());
    }
}
