use serde::{Deserialize, Serialize};
use std::fmt;

use super::bookmark::Bookmark;

/// Name of the fallback category recreated whenever no category exists.
pub const DEFAULT_CATEGORY_NAME: &str = "未分類";

/// Storage-assigned category identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named grouping for bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A category paired with its bookmarks, most recently created first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWithBookmarks {
    pub category: Category,
    pub bookmarks: Vec<Bookmark>,
}
