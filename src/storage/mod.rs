//! Storage adapter contract for categories and bookmarks.
//!
//! The consistency engine only ever talks to a [`BookmarkStore`]; the
//! SQLite-backed [`SqliteStore`] is the production implementation.

pub mod change_feed;
pub mod sqlite_store;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::types::bookmark::{Bookmark, BookmarkId};
use crate::types::category::{Category, CategoryId, CategoryWithBookmarks};
use crate::types::errors::StoreError;

pub use change_feed::{ChangeNotifier, Table, TableVersions};
pub use sqlite_store::SqliteStore;

/// Typed query interface over the category and bookmark tables.
///
/// Writes that hit an integrity rule fail with [`StoreError::Constraint`];
/// updates and deletes of missing rows succeed without effect. Every
/// committed write is announced on [`BookmarkStore::changes`].
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn insert_category(&self, name: &str) -> Result<CategoryId, StoreError>;
    /// Inserts a category only if the table is empty. Returns `None` when
    /// another category already exists.
    ///
    /// The default is a read followed by a write; implementations backed by
    /// a transactional store should make it a single statement.
    async fn insert_category_if_none(&self, name: &str) -> Result<Option<CategoryId>, StoreError> {
        if self.list_categories().await?.is_empty() {
            Ok(Some(self.insert_category(name).await?))
        } else {
            Ok(None)
        }
    }
    /// Returns the lowest id among categories named `name`, inserting one
    /// if none exists. The flag is `true` when this call inserted the row.
    ///
    /// Concurrent calls with the same name must agree on one row. The
    /// default is a read followed by a write and gives no such guarantee.
    async fn find_or_insert_category(&self, name: &str) -> Result<(CategoryId, bool), StoreError> {
        if let Some(existing) = self
            .list_categories()
            .await?
            .into_iter()
            .find(|category| category.name == name)
        {
            return Ok((existing.id, false));
        }
        Ok((self.insert_category(name).await?, true))
    }
    async fn update_category(&self, category: &Category) -> Result<(), StoreError>;
    /// Deletes the category and, in the same transaction, all of its bookmarks.
    async fn delete_category(&self, category: &Category) -> Result<(), StoreError>;
    /// All categories in ascending id order.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    async fn insert_bookmark(
        &self,
        title: &str,
        url: &str,
        category_id: CategoryId,
    ) -> Result<BookmarkId, StoreError>;
    async fn update_bookmark(&self, bookmark: &Bookmark) -> Result<(), StoreError>;
    async fn delete_bookmark(&self, bookmark: &Bookmark) -> Result<(), StoreError>;
    async fn find_bookmark_by_url(&self, url: &str) -> Result<Option<Bookmark>, StoreError>;
    async fn find_bookmark_by_id(&self, id: BookmarkId) -> Result<Option<Bookmark>, StoreError>;
    /// Bookmarks of one category, most recently created first.
    async fn list_bookmarks_by_category(&self, id: CategoryId) -> Result<Vec<Bookmark>, StoreError>;

    /// Every category paired with its bookmarks.
    ///
    /// The default composes the point queries; implementations that can read
    /// both tables in one transaction should override it.
    async fn list_categories_with_bookmarks(&self) -> Result<Vec<CategoryWithBookmarks>, StoreError> {
        let categories = self.list_categories().await?;
        let mut grouped = Vec::with_capacity(categories.len());
        for category in categories {
            let bookmarks = self.list_bookmarks_by_category(category.id).await?;
            grouped.push(CategoryWithBookmarks { category, bookmarks });
        }
        Ok(grouped)
    }

    /// Subscribes to per-table change versions.
    fn changes(&self) -> watch::Receiver<TableVersions>;
}
