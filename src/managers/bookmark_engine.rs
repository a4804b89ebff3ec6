//! Bookmark consistency engine for Markshelf.
//!
//! Wraps a [`BookmarkStore`] and owns the two collection invariants:
//! at least one category always exists, and bookmark urls are unique.
//! Every mutation returns a typed result; a target row that vanished because
//! of a concurrent delete is a silent no-op.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::live_query::LiveQuery;
use crate::storage::BookmarkStore;
use crate::types::bookmark::{title_or_url, Bookmark, BookmarkId};
use crate::types::category::{Category, CategoryId, CategoryWithBookmarks, DEFAULT_CATEGORY_NAME};
use crate::types::errors::{EngineError, SaveBookmarkResult, StoreError};

/// Upper bound on empty-set repairs within one operation. Only reached if a
/// concurrent caller deletes every new default category as fast as it appears.
const MAX_REPAIR_ATTEMPTS: usize = 3;

/// Consistency layer between presentation code and the bookmark store.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct BookmarkEngine {
    store: Arc<dyn BookmarkStore>,
    default_category_name: Arc<str>,
}

impl BookmarkEngine {
    /// Creates an engine whose fallback category is named [`DEFAULT_CATEGORY_NAME`].
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self::with_default_category_name(store, DEFAULT_CATEGORY_NAME)
    }

    pub fn with_default_category_name(store: Arc<dyn BookmarkStore>, name: &str) -> Self {
        Self {
            store,
            default_category_name: Arc::from(name),
        }
    }

    pub fn default_category_name(&self) -> &str {
        &self.default_category_name
    }

    pub(crate) fn store(&self) -> &dyn BookmarkStore {
        self.store.as_ref()
    }

    // --- Live queries ---

    /// Live list of categories, never empty.
    pub fn observe_categories(&self) -> LiveQuery<Category> {
        LiveQuery::new(self.clone())
    }

    /// Live list of categories with their bookmarks, never empty.
    ///
    /// Re-emits on changes to either table.
    pub fn observe_categories_with_bookmarks(&self) -> LiveQuery<CategoryWithBookmarks> {
        LiveQuery::new(self.clone())
    }

    // --- One-shot reads ---

    /// Current categories in ascending id order, repairing an empty set first.
    pub async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        self.ensure_default_category().await
    }

    /// Current categories with their bookmarks, repairing an empty set first.
    pub async fn categories_with_bookmarks(&self) -> Result<Vec<CategoryWithBookmarks>, StoreError> {
        self.ensure_default_category().await?;
        let grouped = self.store.list_categories_with_bookmarks().await?;
        if !grouped.is_empty() {
            return Ok(grouped);
        }
        // Emptied again between the two reads. The repaired categories are
        // new, so they have no bookmarks yet.
        let categories = self.ensure_default_category().await?;
        Ok(categories
            .into_iter()
            .map(|category| CategoryWithBookmarks {
                category,
                bookmarks: Vec::new(),
            })
            .collect())
    }

    pub async fn bookmark(&self, id: BookmarkId) -> Result<Option<Bookmark>, StoreError> {
        self.store.find_bookmark_by_id(id).await
    }

    /// Returns `true` if a bookmark with exactly this url exists.
    pub async fn is_bookmark_registered(&self, url: &str) -> Result<bool, StoreError> {
        Ok(self.store.find_bookmark_by_url(url).await?.is_some())
    }

    // --- Category mutations ---

    /// Creates a category, or returns the id of an existing one with the same name.
    pub async fn create_category(&self, name: &str) -> Result<CategoryId, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Validation("category name must not be blank"));
        }
        let (id, inserted) = self.store.find_or_insert_category(name).await?;
        if inserted {
            info!(category_id = %id, "category created");
        } else {
            debug!(category_id = %id, "category already exists");
        }
        Ok(id)
    }

    pub async fn rename_category(&self, id: CategoryId, name: &str) -> Result<(), EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Validation("category name must not be blank"));
        }
        let Some(current) = self.store.find_category(id).await? else {
            debug!(category_id = %id, "rename skipped, category no longer exists");
            return Ok(());
        };
        self.store
            .update_category(&Category {
                name: name.to_string(),
                ..current
            })
            .await?;
        info!(category_id = %id, "category renamed");
        Ok(())
    }

    /// Deletes a category and its bookmarks. If that leaves no categories,
    /// the default category is recreated before returning.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), EngineError> {
        match self.store.find_category(id).await? {
            Some(category) => {
                self.store.delete_category(&category).await?;
                info!(category_id = %id, "category deleted");
            }
            None => debug!(category_id = %id, "delete skipped, category no longer exists"),
        }
        self.ensure_default_category().await?;
        Ok(())
    }

    // --- Bookmark mutations ---

    /// Saves a new bookmark. A blank title is replaced by the url.
    pub async fn save_bookmark(&self, title: &str, url: &str, category_id: CategoryId) -> SaveBookmarkResult {
        if url.trim().is_empty() {
            return SaveBookmarkResult::Invalid;
        }
        if let Err(err) = self.ensure_default_category().await {
            warn!(error = %err, "could not ensure a category before saving bookmark");
            return SaveBookmarkResult::Storage(err);
        }
        match self
            .store
            .insert_bookmark(title_or_url(title, url), url, category_id)
            .await
        {
            Ok(id) => {
                info!(bookmark_id = %id, %category_id, "bookmark saved");
                SaveBookmarkResult::Success
            }
            Err(err) if err.is_unique_violation() => {
                debug!(url, "bookmark url already registered");
                SaveBookmarkResult::Duplicate
            }
            Err(err) => {
                warn!(error = %err, "bookmark save failed");
                SaveBookmarkResult::Storage(err)
            }
        }
    }

    pub async fn update_bookmark(
        &self,
        id: BookmarkId,
        title: &str,
        category_id: CategoryId,
    ) -> Result<(), EngineError> {
        let Some(current) = self.store.find_bookmark_by_id(id).await? else {
            debug!(bookmark_id = %id, "update skipped, bookmark no longer exists");
            return Ok(());
        };
        let title = title_or_url(title, &current.url).to_string();
        self.store
            .update_bookmark(&Bookmark {
                title,
                category_id,
                ..current
            })
            .await?;
        info!(bookmark_id = %id, %category_id, "bookmark updated");
        Ok(())
    }

    pub async fn delete_bookmark(&self, id: BookmarkId) -> Result<(), EngineError> {
        match self.store.find_bookmark_by_id(id).await? {
            Some(bookmark) => {
                self.store.delete_bookmark(&bookmark).await?;
                info!(bookmark_id = %id, "bookmark deleted");
            }
            None => debug!(bookmark_id = %id, "delete skipped, bookmark no longer exists"),
        }
        Ok(())
    }

    // --- Invariant repair ---

    /// Returns the current categories, inserting the default category first
    /// if there are none. The returned list is never empty.
    async fn ensure_default_category(&self) -> Result<Vec<Category>, StoreError> {
        for _ in 0..MAX_REPAIR_ATTEMPTS {
            let categories = self.store.list_categories().await?;
            if !categories.is_empty() {
                return Ok(categories);
            }
            match self
                .store
                .insert_category_if_none(&self.default_category_name)
                .await
            {
                Ok(Some(id)) => info!(category_id = %id, "default category recreated"),
                Ok(None) => debug!("category set repaired concurrently"),
                Err(err) => return Err(err),
            }
        }
        let categories = self.store.list_categories().await?;
        if categories.is_empty() {
            warn!("category set emptied faster than it could be repaired");
            return Err(StoreError::Database(
                "category set could not be repaired".to_string(),
            ));
        }
        Ok(categories)
    }
}
