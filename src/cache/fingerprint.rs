//! Stable identifiers for logical API requests
//!
//! A fingerprint is a SHA-224 digest over the operation name and the request
//! parameters. Parameters are sorted by key before hashing, so two requests
//! with the same key/value pairs always share a fingerprint no matter how the
//! caller assembled them.

use sha2::{Digest, Sha224};
use std::collections::BTreeMap;

/// Computes the fingerprint of a request.
///
/// Values are coerced with `ToString`, so numeric and enum-like parameters hash
/// the same as their string form. Every component is length-prefixed before
/// it reaches the hasher, which keeps `("ab", "c")` and `("a", "bc")` apart.
///
/// # Returns
/// A 56 character lowercase hex string.
pub fn fingerprint<K, V, I>(method: &str, params: I) -> String
where
    K: AsRef<str>,
    V: ToString,
    I: IntoIterator<Item = (K, V)>,
{
    let sorted: BTreeMap<String, String> = params
        .into_iter()
        .map(|(key, value)| (key.as_ref().to_string(), value.to_string()))
        .collect();

    let mut hasher = Sha224::new();
    update_prefixed(&mut hasher, method);
    for (key, value) in &sorted {
        update_prefixed(&mut hasher, key);
        update_prefixed(&mut hasher, value);
    }
    hex::encode(hasher.finalize())
}

fn update_prefixed(hasher: &mut Sha224, part: &str) {
    hasher.update((part.len() as u64).to_le_bytes());
    hasher.update(part.as_bytes());
}
