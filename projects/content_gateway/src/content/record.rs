use std::cmp::Ordering;

use serde::Serialize;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];
pub const TEXT_EXTENSION: &str = "txt";

/// Body shown for a text record whose download failed.
pub const UNAVAILABLE_BODY: &str = "record unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Image,
    Text,
}

impl ContentKind {
    /// Whether `name` carries an extension belonging to this kind (case-insensitive).
    pub fn accepts(self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        match self {
            ContentKind::Image => IMAGE_EXTENSIONS
                .iter()
                .any(|ext| lower.ends_with(&format!(".{ext}"))),
            ContentKind::Text => lower.ends_with(&format!(".{TEXT_EXTENSION}")),
        }
    }
}

/// One stored file as returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub url: String,
    pub size: u64,
    #[serde(rename = "uploadTime")]
    pub sort_key: String,
    #[serde(rename = "content", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(rename = "githubUrl")]
    pub store_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

/// Prefix of `name` before its first `.`.
pub fn sort_key_of(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Leading run of ASCII digits parsed as an integer, if any.
fn leading_timestamp(sort_key: &str) -> Option<u128> {
    let end = sort_key
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(sort_key.len());
    sort_key[..end].parse().ok()
}

/// Newest first. Keys with a numeric timestamp come before keys without one;
/// ties and non-numeric keys fall back to descending string order.
pub fn newest_first(a: &str, b: &str) -> Ordering {
    match (leading_timestamp(a), leading_timestamp(b)) {
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| b.cmp(a)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}

pub fn sort_newest_first(records: &mut [ContentRecord]) {
    records.sort_by(|a, b| {
        newest_first(&a.sort_key, &b.sort_key).then_with(|| b.name.cmp(&a.name))
    });
}
