//! File-backed store for raw API responses
//!
//! All entries live in a single JSON file that maps a request fingerprint to a
//! `[timestamp, response]` pair. The file is read once when the store is
//! loaded and rewritten in full after every insert, so a process that dies
//! mid-run keeps everything it fetched up to that point.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the cache file inside the cache directory
pub const CACHE_FILE_NAME: &str = "youtube_request_cache.json";

/// Errors that can occur when reading or writing the cache file
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the cache file failed
    #[error("cache I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache file exists but is not a valid cache document
    #[error("cache file {} is corrupted: {source}", path.display())]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A cached response together with the time it was written
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// When the response was stored
    pub cached_at: DateTime<Utc>,
    /// The raw response body
    pub payload: Value,
}

/// On-disk shape of one entry: `[RFC 3339 timestamp, response]`
type StoredEntry = (String, Value);

/// Maps request fingerprints to cached responses
///
/// Expired entries are dropped when the file is loaded. Reads check the age
/// again because the TTL is relative to wall-clock time, which keeps moving in
/// a long-running process. Writes never evict anything.
///
/// There is no file locking: two stores writing the same file will lose each
/// other's updates.
#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    ttl: Duration,
    entries: BTreeMap<String, CacheEntry>,
}

impl CacheStore {
    /// Creates an empty store that will persist to `path`
    pub fn empty(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
            entries: BTreeMap::new(),
        }
    }

    /// Loads the store from `path`, keeping only entries younger than `ttl`
    ///
    /// # Returns
    /// * `Ok(CacheStore)` - an empty store if the file does not exist
    /// * `Err(CacheError::Corrupted)` if the file is not a JSON object of
    ///   `[timestamp, response]` pairs
    /// * `Err(CacheError::Io)` if the file exists but cannot be read
    ///
    /// Individual entries whose timestamp cannot be parsed are skipped.
    pub fn load(path: impl Into<PathBuf>, ttl: Duration) -> Result<Self, CacheError> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::empty(path, ttl)),
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let stored: BTreeMap<String, StoredEntry> = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(source) => return Err(CacheError::Corrupted { path, source }),
        };

        let now = Utc::now();
        let total = stored.len();
        let mut entries = BTreeMap::new();
        for (fingerprint, (timestamp, payload)) in stored {
            let cached_at = match DateTime::parse_from_rfc3339(&timestamp) {
                Ok(t) => t.with_timezone(&Utc),
                Err(e) => {
                    tracing::warn!(%fingerprint, %timestamp, "skipping cache entry: {e}");
                    continue;
                }
            };
            if is_fresh(cached_at, now, ttl) {
                entries.insert(fingerprint, CacheEntry { cached_at, payload });
            }
        }

        tracing::debug!(
            path = %path.display(),
            kept = entries.len(),
            dropped = total - entries.len(),
            "loaded request cache"
        );
        Ok(Self { path, ttl, entries })
    }

    /// Loads the store, falling back to an empty one if the file is unusable
    ///
    /// Caching only saves network calls, so a damaged file is logged and
    /// replaced on the next write rather than failing client construction.
    pub fn load_or_empty(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        let path = path.into();
        match Self::load(&path, ttl) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("starting with an empty request cache: {e}");
                Self::empty(path, ttl)
            }
        }
    }

    /// Returns the cached response for `fingerprint` if it has not expired
    pub fn get(&self, fingerprint: &str) -> Option<&Value> {
        self.get_at(fingerprint, Utc::now())
    }

    fn get_at(&self, fingerprint: &str, now: DateTime<Utc>) -> Option<&Value> {
        self.entries
            .get(fingerprint)
            .filter(|entry| is_fresh(entry.cached_at, now, self.ttl))
            .map(|entry| &entry.payload)
    }

    /// Stores `payload` under `fingerprint` and rewrites the cache file
    ///
    /// Any previous entry for the same fingerprint is replaced. The write is
    /// synchronous: when this returns `Ok`, the entry is on disk.
    pub fn put(&mut self, fingerprint: &str, payload: Value) -> Result<(), CacheError> {
        self.put_at(fingerprint, payload, Utc::now())
    }

    fn put_at(
        &mut self,
        fingerprint: &str,
        payload: Value,
        cached_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        self.entries
            .insert(fingerprint.to_string(), CacheEntry { cached_at, payload });
        self.persist()
    }

    /// Returns the raw entry for `fingerprint`, expired or not
    pub fn entry(&self, fingerprint: &str) -> Option<&CacheEntry> {
        self.entries.get(fingerprint)
    }

    /// Number of entries held in memory
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Rewrites the whole cache file
    ///
    /// The document goes to a sibling temp file first and is then renamed over
    /// the target, so readers never see a half-written file.
    fn persist(&self) -> Result<(), CacheError> {
        let io_err = |source| CacheError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        let stored: BTreeMap<&str, (String, &Value)> = self
            .entries
            .iter()
            .map(|(fp, entry)| (fp.as_str(), (entry.cached_at.to_rfc3339(), &entry.payload)))
            .collect();
        let json = serde_json::to_string(&stored)
            .map_err(|e| io_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        tracing::debug!(
            path = %self.path.display(),
            entries = self.entries.len(),
            "saved request cache"
        );
        Ok(())
    }
}

/// Whether an entry written at `cached_at` is still valid at `now`
fn is_fresh(cached_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(cached_at) < ttl
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn cache_path(dir: &TempDir) -> PathBuf {
        dir.path().join(CACHE_FILE_NAME)
    }

    fn create_test_store() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::empty(cache_path(&temp_dir), Duration::hours(24));
        (store, temp_dir)
    }

    #[test]
    fn test_put_then_get_returns_payload() {
        let (mut store, _temp_dir) = create_test_store();
        let payload = json!({"items": [{"id": "abc"}]});

        store.put("fp1", payload.clone()).expect("Put should succeed");

        assert_eq!(store.get("fp1"), Some(&payload));
    }

    #[test]
    fn test_get_returns_none_for_missing_fingerprint() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_entry_is_fresh_just_before_ttl_and_stale_just_after() {
        let (mut store, _temp_dir) = create_test_store();
        let written = Utc::now() - Duration::hours(1);
        store
            .put_at("fp", json!({"items": []}), written)
            .expect("Put should succeed");

        let epsilon = Duration::seconds(1);
        let ttl = store.ttl();
        assert!(store.get_at("fp", written + ttl - epsilon).is_some());
        assert!(store.get_at("fp", written + ttl + epsilon).is_none());
        // the entry itself is not evicted by a stale read
        assert!(store.entry("fp").is_some());
    }

    #[test]
    fn test_put_writes_fingerprint_to_timestamp_payload_pairs() {
        let (mut store, temp_dir) = create_test_store();
        store
            .put("fp", json!({"kind": "youtube#searchListResponse"}))
            .expect("Put should succeed");

        let content = fs::read_to_string(cache_path(&temp_dir)).expect("Should read file");
        let raw: Value = serde_json::from_str(&content).expect("Should be JSON");
        let pair = raw["fp"].as_array().expect("entry should be an array");
        assert_eq!(pair.len(), 2);
        assert!(DateTime::parse_from_rfc3339(pair[0].as_str().unwrap()).is_ok());
        assert_eq!(pair[1]["kind"], "youtube#searchListResponse");
    }

    #[test]
    fn test_load_restores_entries_written_by_previous_store() {
        let (mut store, temp_dir) = create_test_store();
        store.put("a", json!(1)).unwrap();
        store.put("b", json!({"x": [1, 2]})).unwrap();

        let reloaded = CacheStore::load(cache_path(&temp_dir), Duration::hours(24))
            .expect("Load should succeed");

        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("a"), Some(&json!(1)));
        assert_eq!(reloaded.get("b"), Some(&json!({"x": [1, 2]})));
    }

    #[test]
    fn test_load_drops_expired_entries() {
        let temp_dir = TempDir::new().unwrap();
        let path = cache_path(&temp_dir);
        let old = (Utc::now() - Duration::hours(48)).to_rfc3339();
        let recent = (Utc::now() - Duration::hours(1)).to_rfc3339();
        let doc = json!({
            "old": [old, {"items": []}],
            "recent": [recent, {"items": [1]}],
        });
        fs::write(&path, doc.to_string()).unwrap();

        let store = CacheStore::load(&path, Duration::hours(24)).expect("Load should succeed");

        assert!(store.entry("old").is_none());
        assert_eq!(store.get("recent"), Some(&json!({"items": [1]})));
    }

    #[test]
    fn test_load_skips_entries_with_bad_timestamps() {
        let temp_dir = TempDir::new().unwrap();
        let path = cache_path(&temp_dir);
        let doc = json!({
            "bad": ["yesterday-ish", {}],
            "good": [Utc::now().to_rfc3339(), {"ok": true}],
        });
        fs::write(&path, doc.to_string()).unwrap();

        let store = CacheStore::load(&path, Duration::hours(24)).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get("good").is_some());
    }

    #[test]
    fn test_load_missing_file_returns_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::load(cache_path(&temp_dir), Duration::hours(24))
            .expect("Missing file is not an error");
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_corrupted_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = cache_path(&temp_dir);
        fs::write(&path, "{not json").unwrap();

        let result = CacheStore::load(&path, Duration::hours(24));

        assert!(matches!(result, Err(CacheError::Corrupted { .. })));
    }

    #[test]
    fn test_load_or_empty_recovers_from_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = cache_path(&temp_dir);
        fs::write(&path, "[1, 2, 3]").unwrap();

        let mut store = CacheStore::load_or_empty(&path, Duration::hours(24));
        assert!(store.is_empty());

        // the next write replaces the damaged file
        store.put("fp", json!("fresh")).unwrap();
        let reloaded = CacheStore::load(&path, Duration::hours(24)).unwrap();
        assert_eq!(reloaded.get("fp"), Some(&json!("fresh")));
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let (mut store, _temp_dir) = create_test_store();
        store.put("fp", json!("first")).unwrap();
        store.put("fp", json!("second")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("fp"), Some(&json!("second")));
    }

    #[test]
    fn test_put_creates_directory_if_missing() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("cache");
        let mut store = CacheStore::empty(nested.join(CACHE_FILE_NAME), Duration::hours(24));

        store.put("fp", json!(null)).expect("Put should succeed");

        assert!(nested.join(CACHE_FILE_NAME).exists());
        assert!(!nested.join("youtube_request_cache.json.tmp").exists());
    }
}
