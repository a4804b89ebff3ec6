//! Edit buffers for the bookmark and category dialogs and the requests they
//! submit.

use async_trait::async_trait;

use super::edit_dialog::{Draft, SaveOutcome, Submit};
use crate::managers::BookmarkEngine;
use crate::types::bookmark::{title_or_url, Bookmark, BookmarkId};
use crate::types::category::{Category, CategoryId};

// === Existing bookmark ===

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkDraft {
    pub id: BookmarkId,
    pub title: String,
    pub url: String,
    pub category_id: CategoryId,
}

impl From<&Bookmark> for BookmarkDraft {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            id: bookmark.id,
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            category_id: bookmark.category_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBookmarkRequest {
    pub id: BookmarkId,
    pub title: String,
    pub category_id: CategoryId,
}

impl Draft for BookmarkDraft {
    type Request = UpdateBookmarkRequest;

    fn prepare(&self) -> Option<UpdateBookmarkRequest> {
        Some(UpdateBookmarkRequest {
            id: self.id,
            title: title_or_url(&self.title, &self.url).to_string(),
            category_id: self.category_id,
        })
    }
}

#[async_trait]
impl Submit for UpdateBookmarkRequest {
    async fn submit(self, engine: &BookmarkEngine) -> SaveOutcome {
        engine
            .update_bookmark(self.id, &self.title, self.category_id)
            .await
            .into()
    }
}

// === Category (new or existing) ===

/// `id` is `None` while adding a new category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub id: Option<CategoryId>,
    pub name: String,
}

impl CategoryDraft {
    pub fn new_category() -> Self {
        Self {
            id: None,
            name: String::new(),
        }
    }
}

impl From<&Category> for CategoryDraft {
    fn from(category: &Category) -> Self {
        Self {
            id: Some(category.id),
            name: category.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRequest {
    Create { name: String },
    Rename { id: CategoryId, name: String },
}

impl Draft for CategoryDraft {
    type Request = CategoryRequest;

    fn prepare(&self) -> Option<CategoryRequest> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        let name = name.to_string();
        Some(match self.id {
            Some(id) => CategoryRequest::Rename { id, name },
            None => CategoryRequest::Create { name },
        })
    }
}

#[async_trait]
impl Submit for CategoryRequest {
    async fn submit(self, engine: &BookmarkEngine) -> SaveOutcome {
        match self {
            CategoryRequest::Create { name } => engine.create_category(&name).await.into(),
            CategoryRequest::Rename { id, name } => engine.rename_category(id, &name).await.into(),
        }
    }
}

// === New bookmark from the browse screen ===

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookmarkDraft {
    pub title: String,
    pub url: String,
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveBookmarkRequest {
    pub title: String,
    pub url: String,
    pub category_id: CategoryId,
}

impl Draft for NewBookmarkDraft {
    type Request = SaveBookmarkRequest;

    fn prepare(&self) -> Option<SaveBookmarkRequest> {
        let category_id = self.category_id?;
        if self.url.trim().is_empty() {
            return None;
        }
        Some(SaveBookmarkRequest {
            title: title_or_url(&self.title, &self.url).to_string(),
            url: self.url.clone(),
            category_id,
        })
    }
}

#[async_trait]
impl Submit for SaveBookmarkRequest {
    async fn submit(self, engine: &BookmarkEngine) -> SaveOutcome {
        engine
            .save_bookmark(&self.title, &self.url, self.category_id)
            .await
            .into()
    }
}
