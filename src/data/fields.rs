//! Field paths into raw API resources
//!
//! Each domain attribute is read from the response through a fixed sequence
//! of object keys. The paths are plain constants; nothing here is mutable.

use serde_json::Value;

use crate::api::ApiError;

/// Keys to follow from the resource root to a value
pub type FieldPath = &'static [&'static str];

/// Paths shared by every resource that carries a `snippet`
pub mod snippet {
    use super::FieldPath;

    pub const TITLE: FieldPath = &["snippet", "title"];
    pub const DESCRIPTION: FieldPath = &["snippet", "description"];
    pub const THUMBNAIL_URL: FieldPath = &["snippet", "thumbnails", "medium", "url"];
    pub const PUBLISHED_AT: FieldPath = &["snippet", "publishedAt"];
    pub const LIVE_BROADCAST: FieldPath = &["snippet", "liveBroadcastContent"];
    pub const CHANNEL_ID: FieldPath = &["snippet", "channelId"];
}

/// Paths into `search.list` results
pub mod search_result {
    use super::FieldPath;

    pub const VIDEO_ID: FieldPath = &["id", "videoId"];
}

/// Paths into `videos.list` resources
pub mod video {
    use super::FieldPath;

    pub const ID: FieldPath = &["id"];
    pub const DURATION: FieldPath = &["contentDetails", "duration"];
}

/// Paths into `channels.list` resources
pub mod channel {
    use super::FieldPath;

    pub const ID: FieldPath = &["id"];
}

/// Follows `path` from `document`
///
/// # Returns
/// * `Ok(&Value)` - the value at the end of the path
/// * `Err(ApiError::MissingField)` - some key along the path is absent; the
///   error names the full dotted path
pub fn resolve<'a>(path: &[&str], document: &'a Value) -> Result<&'a Value, ApiError> {
    path.iter().try_fold(document, |node, key| {
        node.get(*key)
            .ok_or_else(|| ApiError::MissingField(path.join(".")))
    })
}

/// Like [`resolve`], but the value must be a string
pub fn resolve_str<'a>(path: &[&str], document: &'a Value) -> Result<&'a str, ApiError> {
    let value = resolve(path, document)?;
    value.as_str().ok_or_else(|| ApiError::InvalidField {
        field: path.join("."),
        reason: format!("expected a string, got {value}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search_item() -> Value {
        json!({
            "kind": "youtube#searchResult",
            "id": {"kind": "youtube#video", "videoId": "zhkFscdoMbs"},
            "snippet": {
                "title": "Rust in 100 seconds",
                "thumbnails": {
                    "medium": {"url": "https://i.ytimg.com/vi/zhkFscdoMbs/mqdefault.jpg"}
                }
            }
        })
    }

    #[test]
    fn test_resolve_nested_path() {
        let item = search_item();
        assert_eq!(
            resolve_str(snippet::THUMBNAIL_URL, &item).unwrap(),
            "https://i.ytimg.com/vi/zhkFscdoMbs/mqdefault.jpg"
        );
        assert_eq!(resolve_str(search_result::VIDEO_ID, &item).unwrap(), "zhkFscdoMbs");
    }

    #[test]
    fn test_resolve_empty_path_returns_document() {
        let item = search_item();
        assert_eq!(resolve(&[], &item).unwrap(), &item);
    }

    #[test]
    fn test_resolve_missing_key_names_full_path() {
        let item = search_item();
        let err = resolve(snippet::PUBLISHED_AT, &item).unwrap_err();
        assert!(matches!(err, ApiError::MissingField(ref p) if p == "snippet.publishedAt"));
    }

    #[test]
    fn test_resolve_through_non_object_is_missing() {
        let item = search_item();
        // `id` is an object in search results, so `id.videoId.x` runs into a string
        let err = resolve(&["id", "videoId", "x"], &item).unwrap_err();
        assert!(matches!(err, ApiError::MissingField(_)));
    }

    #[test]
    fn test_resolve_str_rejects_non_strings() {
        let item = search_item();
        let err = resolve_str(&["id"], &item).unwrap_err();
        assert!(matches!(err, ApiError::InvalidField { ref field, .. } if field == "id"));
    }
}
