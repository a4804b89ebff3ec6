//! Live snapshot subscriptions over the bookmark engine.

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use super::bookmark_engine::BookmarkEngine;
use crate::storage::{Table, TableVersions};
use crate::types::category::{Category, CategoryWithBookmarks};
use crate::types::errors::StoreError;

/// A row type that can be observed as a live list.
#[async_trait]
pub trait LiveSnapshot: Sized + Clone + PartialEq + Send + Sync + 'static {
    /// Tables whose writes invalidate a snapshot.
    const TABLES: &'static [Table];

    async fn load(engine: &BookmarkEngine) -> Result<Vec<Self>, StoreError>;
}

#[async_trait]
impl LiveSnapshot for Category {
    const TABLES: &'static [Table] = &[Table::Categories];

    async fn load(engine: &BookmarkEngine) -> Result<Vec<Self>, StoreError> {
        engine.categories().await
    }
}

#[async_trait]
impl LiveSnapshot for CategoryWithBookmarks {
    const TABLES: &'static [Table] = &[Table::Categories, Table::Bookmarks];

    async fn load(engine: &BookmarkEngine) -> Result<Vec<Self>, StoreError> {
        engine.categories_with_bookmarks().await
    }
}

/// A long-lived subscription yielding a fresh snapshot after every relevant
/// committed write.
///
/// The first [`next`](LiveQuery::next) returns the current state right away.
/// Consecutive identical snapshots are suppressed, and bursts of writes may
/// be coalesced into one snapshot of the latest state. Dropping the query
/// ends the subscription.
pub struct LiveQuery<T> {
    engine: BookmarkEngine,
    changes: watch::Receiver<TableVersions>,
    seen: TableVersions,
    last: Option<Vec<T>>,
    /// Set when a reload failed; the next call reloads without waiting.
    stale: bool,
}

impl<T: LiveSnapshot> LiveQuery<T> {
    pub(crate) fn new(engine: BookmarkEngine) -> Self {
        let mut changes = engine.store().changes();
        let seen = *changes.borrow_and_update();
        Self {
            engine,
            changes,
            seen,
            last: None,
            stale: false,
        }
    }

    /// Waits for the next distinct snapshot.
    ///
    /// Returns `None` once the store stops publishing changes. A failed read
    /// is returned as `Some(Err(..))`; the subscription stays usable and the
    /// following call retries the read before waiting for new writes.
    pub async fn next(&mut self) -> Option<Result<Vec<T>, StoreError>> {
        loop {
            if self.last.is_some() && !self.stale && !self.wait_for_change().await {
                return None;
            }
            match T::load(&self.engine).await {
                Ok(snapshot) => {
                    self.stale = false;
                    if self.last.as_ref() == Some(&snapshot) {
                        continue;
                    }
                    self.last = Some(snapshot.clone());
                    return Some(Ok(snapshot));
                }
                Err(err) => {
                    debug!(error = %err, "live reload failed, retrying on next poll");
                    self.stale = true;
                    return Some(Err(err));
                }
            }
        }
    }

    /// The most recently emitted snapshot.
    pub fn latest(&self) -> Option<&[T]> {
        self.last.as_deref()
    }

    /// Blocks until a watched table moves past the last seen version.
    async fn wait_for_change(&mut self) -> bool {
        loop {
            if self.changes.changed().await.is_err() {
                return false;
            }
            let current = *self.changes.borrow_and_update();
            if self.seen.changed_since(&current, T::TABLES) {
                self.seen = current;
                return true;
            }
        }
    }
}
