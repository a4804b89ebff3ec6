use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CategoryId;

/// Storage-assigned bookmark identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(pub i64);

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a saved bookmark. `url` is unique across all bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub category_id: CategoryId,
    pub title: String,
    pub url: String,
}

/// Returns `title`, or `url` when the title is blank.
pub fn title_or_url<'a>(title: &'a str, url: &'a str) -> &'a str {
    if title.trim().is_empty() {
        url
    } else {
        title
    }
}
