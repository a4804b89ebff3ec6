// Markshelf state managers
// The consistency engine and the live queries it hands out.

pub mod bookmark_engine;
pub mod live_query;

pub use bookmark_engine::BookmarkEngine;
pub use live_query::{LiveQuery, LiveSnapshot};
