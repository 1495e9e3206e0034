//! Aggregation loops for paged and batched endpoints

use serde_json::Value;
use std::num::NonZeroUsize;

use super::ApiError;

/// One page of a list response
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Token for the next page; `None` on the last page
    pub next_page_token: Option<String>,
}

impl Page<Value> {
    /// Splits a raw list response into its `items` and `nextPageToken`
    pub fn from_response(mut response: Value) -> Result<Self, ApiError> {
        let items = match response.get_mut("items").map(Value::take) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ApiError::InvalidField {
                    field: "items".to_string(),
                    reason: format!("expected an array, got {other}"),
                })
            }
            None => return Err(ApiError::MissingField("items".to_string())),
        };
        let next_page_token = response
            .get("nextPageToken")
            .and_then(Value::as_str)
            .map(String::from);
        Ok(Self {
            items,
            next_page_token,
        })
    }
}

/// Fetches pages until the provider runs out, returning every item in order
///
/// `fetch_page` is first called without a token. The loop stops as soon as a
/// page has no items or no continuation token; either one is enough. There is
/// no upper bound on the number of pages.
///
/// An error from any page aborts the loop. Items gathered so far are dropped.
pub fn collect_all<T, E, F>(mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, E>,
{
    let mut items = Vec::new();
    let mut page = fetch_page(None)?;
    while !page.items.is_empty() {
        items.append(&mut page.items);
        match page.next_page_token.take() {
            Some(token) => page = fetch_page(Some(token.as_str()))?,
            None => break,
        }
    }
    Ok(items)
}

/// Fetches `ids` in consecutive windows of at most `batch_size`
///
/// Results are concatenated in window order. The provider may reorder items
/// within one window. An empty `ids` slice makes no calls.
pub fn collect_in_batches<S, T, E, F>(
    ids: &[S],
    batch_size: NonZeroUsize,
    mut fetch_batch: F,
) -> Result<Vec<T>, E>
where
    F: FnMut(&[S]) -> Result<Vec<T>, E>,
{
    let mut items = Vec::new();
    for window in ids.chunks(batch_size.get()) {
        items.extend(fetch_batch(window)?);
    }
    Ok(items)
}
