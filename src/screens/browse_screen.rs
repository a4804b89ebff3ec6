//! Browse screen: tracks the page on display and its "save bookmark" dialog.

use tracing::debug;

use super::drafts::NewBookmarkDraft;
use super::edit_dialog::{DialogMessage, EditDialog};
use crate::managers::{BookmarkEngine, LiveQuery};
use crate::types::bookmark::title_or_url;
use crate::types::category::{Category, CategoryId};
use crate::types::errors::{EngineError, StoreError};

pub struct BrowseScreen {
    engine: BookmarkEngine,
    current_url: String,
    current_title: String,
    categories: Vec<Category>,
    save_dialog: EditDialog<NewBookmarkDraft>,
}

impl BrowseScreen {
    pub fn new(engine: BookmarkEngine) -> Self {
        Self {
            engine,
            current_url: String::new(),
            current_title: String::new(),
            categories: Vec::new(),
            save_dialog: EditDialog::new(),
        }
    }

    pub fn subscribe(&self) -> LiveQuery<Category> {
        self.engine.observe_categories()
    }

    /// Replaces the known categories. An open dialog whose selection is unset
    /// or no longer exists falls back to the first category.
    pub fn apply_categories(&mut self, categories: Vec<Category>) {
        let first = categories.first().map(|c| c.id);
        self.save_dialog.update(|draft| {
            let still_exists = draft
                .category_id
                .is_some_and(|id| categories.iter().any(|c| c.id == id));
            if !still_exists {
                draft.category_id = first;
            }
        });
        self.categories = categories;
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn on_page_updated(&mut self, url: &str, title: Option<&str>) {
        self.current_url = url.to_string();
        self.current_title = title.unwrap_or_default().to_string();
    }

    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    pub fn save_dialog(&self) -> &EditDialog<NewBookmarkDraft> {
        &self.save_dialog
    }

    pub fn save_dialog_mut(&mut self) -> &mut EditDialog<NewBookmarkDraft> {
        &mut self.save_dialog
    }

    /// Opens the save dialog for the current page with the first category
    /// selected. A url that is already bookmarked only shows a warning.
    ///
    /// Returns `false` when there is no page to save.
    pub async fn open_save_dialog(&mut self) -> Result<bool, StoreError> {
        if self.current_url.trim().is_empty() {
            return Ok(false);
        }
        let url = self.current_url.clone();
        let registered = self.engine.is_bookmark_registered(&url).await?;
        if self.categories.is_empty() {
            self.categories = self.engine.categories().await?;
        }
        self.save_dialog.start(NewBookmarkDraft {
            title: title_or_url(&self.current_title, &url).to_string(),
            url,
            category_id: self.categories.first().map(|c| c.id),
        });
        if registered {
            debug!("current page is already bookmarked");
            self.save_dialog.set_message(Some(DialogMessage::AlreadyRegistered));
        }
        Ok(true)
    }

    pub fn update_save_title(&mut self, title: &str) {
        self.save_dialog.update(|draft| draft.title = title.to_string());
    }

    /// Changes the url being saved. Clears a warning that referred to the old url.
    pub fn update_save_url(&mut self, url: &str) {
        self.save_dialog.update(|draft| draft.url = url.to_string());
        self.save_dialog.set_message(None);
    }

    pub fn select_save_category(&mut self, category_id: CategoryId) {
        self.save_dialog.update(|draft| draft.category_id = Some(category_id));
    }

    /// Creates (or finds) a category by name and selects it in the dialog.
    /// A blank name is ignored.
    pub async fn create_category_from_dialog(&mut self, name: &str) -> Result<Option<CategoryId>, EngineError> {
        if name.trim().is_empty() {
            return Ok(None);
        }
        let id = self.engine.create_category(name).await?;
        self.select_save_category(id);
        Ok(Some(id))
    }

    pub async fn save_bookmark(&mut self) -> bool {
        self.save_dialog.save(&self.engine).await
    }

    pub fn close_save_dialog(&mut self) {
        self.save_dialog.dismiss();
    }
}
