//! Cache module for storing API responses to disk
//!
//! Requests are identified by a [`fingerprint`] of their operation name and
//! parameters. A [`CacheStore`] maps fingerprints to raw responses, persists
//! them in a single JSON file and hides entries older than a configurable
//! time-to-live.

mod fingerprint;
mod store;

pub use fingerprint::fingerprint;
pub use store::{CacheEntry, CacheError, CacheStore, CACHE_FILE_NAME};
