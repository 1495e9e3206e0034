//! Request execution with and without the response cache

use serde_json::Value;
use std::fmt;

use super::params::QueryParams;
use super::transport::{RawResponse, Transport};
use super::ApiError;
use crate::cache::{fingerprint, CacheStore};
use crate::config::redact;

/// Query parameter that carries the developer key
///
/// Reserved: a caller-supplied `key` entry is dropped from both the outgoing
/// query and the fingerprint.
pub const CREDENTIAL_PARAM: &str = "key";

/// Parameters of the logical request, without any credential entry
fn logical_params(params: &QueryParams) -> impl Iterator<Item = (&String, &String)> {
    params.iter().filter(|(k, _)| k.as_str() != CREDENTIAL_PARAM)
}

/// Cache fingerprint of a request, ignoring the reserved credential parameter
pub fn request_fingerprint(method: &str, params: &QueryParams) -> String {
    fingerprint(method, logical_params(params))
}

/// Sends requests to the API and checks responses for reported errors
///
/// The developer key is appended to every outgoing request. It is not part of
/// the logical request, so it never reaches the cache fingerprint.
pub struct RawExecutor<T> {
    transport: T,
    base_url: String,
    developer_key: String,
}

impl<T: Transport> RawExecutor<T> {
    pub fn new(
        transport: T,
        base_url: impl Into<String>,
        developer_key: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            developer_key: developer_key.into(),
        }
    }

    /// Calls `method` on the API and returns the parsed response
    ///
    /// # Returns
    /// * `Ok(Value)` - the response body
    /// * `Err(ApiError::Upstream)` - the body carries an `error` object, or the
    ///   status is not 2xx
    /// * `Err(ApiError::Parse)` - a 2xx response whose body is not JSON
    /// * transport errors are passed through untouched
    pub fn request(&self, method: &str, params: &QueryParams) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, method);
        let mut query: Vec<(String, String)> = logical_params(params)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        tracing::info!(%url, ?query, key = %redact(&self.developer_key), "YouTube request");
        query.push((CREDENTIAL_PARAM.to_string(), self.developer_key.clone()));

        let response = self.transport.get(&url, &query)?;
        let body = parse_body(&response)?;
        check_for_errors(&body, response.status)?;
        Ok(body)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: fmt::Debug> fmt::Debug for RawExecutor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawExecutor")
            .field("transport", &self.transport)
            .field("base_url", &self.base_url)
            .field("developer_key", &redact(&self.developer_key))
            .finish()
    }
}

fn parse_body(response: &RawResponse) -> Result<Value, ApiError> {
    match serde_json::from_slice(&response.body) {
        Ok(body) => Ok(body),
        Err(_) if !response.is_success() => Err(ApiError::Upstream {
            code: Some(response.status),
            message: format!(
                "HTTP {}: {}",
                response.status,
                String::from_utf8_lossy(&response.body).trim()
            ),
        }),
        Err(e) => Err(ApiError::Parse(e)),
    }
}

/// Fails if the API reported an error in the body or through the status
fn check_for_errors(body: &Value, status: u16) -> Result<(), ApiError> {
    if let Some(error) = body.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        let code = error
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok())
            .or(Some(status));
        return Err(ApiError::Upstream { code, message });
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::Upstream {
            code: Some(status),
            message: format!("HTTP {status}"),
        });
    }
    Ok(())
}

/// Answers repeated requests from the cache and forwards the rest
///
/// Without a store (caching disabled) every request goes to the network.
/// Error responses never reach the store, so a failed request is retried the
/// next time it is made.
#[derive(Debug)]
pub struct CachedExecutor<T> {
    raw: RawExecutor<T>,
    cache: Option<CacheStore>,
}

impl<T: Transport> CachedExecutor<T> {
    pub fn new(raw: RawExecutor<T>, cache: Option<CacheStore>) -> Self {
        Self { raw, cache }
    }

    /// Returns the cached response for this request, or fetches and caches it
    ///
    /// A miss is written to disk before this returns.
    pub fn request(&mut self, method: &str, params: &QueryParams) -> Result<Value, ApiError> {
        let Some(cache) = self.cache.as_mut() else {
            return self.raw.request(method, params);
        };

        let fp = request_fingerprint(method, params);
        if let Some(payload) = cache.get(&fp) {
            tracing::info!(method, fingerprint = %fp, "loading response from cache");
            return Ok(payload.clone());
        }

        let payload = self.raw.request(method, params)?;
        tracing::info!(method, fingerprint = %fp, "saving response to cache");
        cache.put(&fp, payload.clone())?;
        Ok(payload)
    }

    pub fn cache(&self) -> Option<&CacheStore> {
        self.cache.as_ref()
    }

    pub fn raw(&self) -> &RawExecutor<T> {
        &self.raw
    }
}
