//! Bookmark list screen: categories with their bookmarks, expand/collapse
//! view state, and the bookmark and category edit dialogs.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::drafts::{BookmarkDraft, CategoryDraft};
use super::edit_dialog::EditDialog;
use crate::managers::{BookmarkEngine, LiveQuery};
use crate::types::bookmark::{Bookmark, BookmarkId};
use crate::types::category::{Category, CategoryId, CategoryWithBookmarks};
use crate::types::errors::EngineError;

pub struct BookmarkScreen {
    engine: BookmarkEngine,
    categories: Vec<CategoryWithBookmarks>,
    expanded: HashSet<CategoryId>,
    bookmark_dialog: EditDialog<BookmarkDraft>,
    category_dialog: EditDialog<CategoryDraft>,
    new_category_name: String,
    creating_category: bool,
}

impl BookmarkScreen {
    pub fn new(engine: BookmarkEngine) -> Self {
        Self {
            engine,
            categories: Vec::new(),
            expanded: HashSet::new(),
            bookmark_dialog: EditDialog::new(),
            category_dialog: EditDialog::new(),
            new_category_name: String::new(),
            creating_category: false,
        }
    }

    /// The live list this screen renders; feed each item to [`apply_snapshot`](Self::apply_snapshot).
    pub fn subscribe(&self) -> LiveQuery<CategoryWithBookmarks> {
        self.engine.observe_categories_with_bookmarks()
    }

    /// Replaces the rendered list and reconciles expand state: categories
    /// seen before keep their state, new ones start expanded, removed ones
    /// are forgotten.
    pub fn apply_snapshot(&mut self, snapshot: Vec<CategoryWithBookmarks>) {
        let previous: HashSet<CategoryId> = self.categories.iter().map(|c| c.category.id).collect();
        self.expanded = snapshot
            .iter()
            .map(|c| c.category.id)
            .filter(|id| !previous.contains(id) || self.expanded.contains(id))
            .collect();
        self.categories = snapshot;
    }

    pub fn categories(&self) -> &[CategoryWithBookmarks] {
        &self.categories
    }

    pub fn is_expanded(&self, id: CategoryId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn toggle_expanded(&mut self, id: CategoryId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn bookmark_dialog(&self) -> &EditDialog<BookmarkDraft> {
        &self.bookmark_dialog
    }

    pub fn bookmark_dialog_mut(&mut self) -> &mut EditDialog<BookmarkDraft> {
        &mut self.bookmark_dialog
    }

    pub fn category_dialog(&self) -> &EditDialog<CategoryDraft> {
        &self.category_dialog
    }

    pub fn category_dialog_mut(&mut self) -> &mut EditDialog<CategoryDraft> {
        &mut self.category_dialog
    }

    // --- New category input ---

    pub fn new_category_name(&self) -> &str {
        &self.new_category_name
    }

    pub fn is_creating_category(&self) -> bool {
        self.creating_category
    }

    pub fn update_new_category_name(&mut self, name: &str) {
        self.new_category_name = name.to_string();
    }

    /// Claims the input buffer for submission. Returns `None` for a blank
    /// name or while a previous create is still running.
    pub fn begin_create_category(&mut self) -> Option<String> {
        if self.creating_category {
            return None;
        }
        let name = self.new_category_name.trim();
        if name.is_empty() {
            return None;
        }
        self.creating_category = true;
        Some(name.to_string())
    }

    /// Clears the guard; the buffer is emptied only on success.
    pub fn finish_create_category(&mut self, result: &Result<CategoryId, EngineError>) {
        self.creating_category = false;
        match result {
            Ok(_) => self.new_category_name.clear(),
            Err(err) => warn!(error = %err, "category create failed"),
        }
    }

    pub async fn create_category(&mut self) -> Option<Result<CategoryId, EngineError>> {
        let name = self.begin_create_category()?;
        let result = self.engine.create_category(&name).await;
        self.finish_create_category(&result);
        Some(result)
    }

    // --- Category dialog ---

    pub fn start_add_category(&mut self) {
        self.category_dialog.start(CategoryDraft::new_category());
    }

    pub fn start_edit_category(&mut self, category: &Category) {
        self.category_dialog.start(CategoryDraft::from(category));
    }

    pub fn update_category_name(&mut self, name: &str) {
        self.category_dialog.update(|draft| draft.name = name.to_string());
    }

    pub async fn save_category_edit(&mut self) -> bool {
        self.category_dialog.save(&self.engine).await
    }

    pub async fn delete_category(&self, id: CategoryId) -> Result<(), EngineError> {
        debug!(category_id = %id, "delete category requested");
        self.engine.delete_category(id).await
    }

    // --- Bookmark dialog ---

    pub fn start_edit_bookmark(&mut self, bookmark: &Bookmark) {
        self.bookmark_dialog.start(BookmarkDraft::from(bookmark));
    }

    pub fn update_bookmark_title(&mut self, title: &str) {
        self.bookmark_dialog.update(|draft| draft.title = title.to_string());
    }

    pub fn select_bookmark_category(&mut self, category_id: CategoryId) {
        self.bookmark_dialog.update(|draft| draft.category_id = category_id);
    }

    pub async fn save_bookmark_edit(&mut self) -> bool {
        self.bookmark_dialog.save(&self.engine).await
    }

    pub async fn delete_bookmark(&self, id: BookmarkId) -> Result<(), EngineError> {
        self.engine.delete_bookmark(id).await
    }

    /// Closes both dialogs, discarding their drafts.
    pub fn dismiss_dialogs(&mut self) {
        self.bookmark_dialog.dismiss();
        self.category_dialog.dismiss();
    }
}
