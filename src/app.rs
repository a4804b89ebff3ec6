//! App Core for Markshelf.
//!
//! Opens the database named by the settings, builds the consistency engine,
//! and hands out screen state bound to it.

use std::sync::Arc;

use tracing::info;

use crate::database::Database;
use crate::managers::BookmarkEngine;
use crate::screens::{BookmarkScreen, BrowseScreen};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::storage::SqliteStore;
use crate::types::errors::AppError;
use crate::types::settings::EngineSettings;

/// Central application struct holding the settings and the engine.
pub struct App {
    pub settings: EngineSettings,
    pub engine: BookmarkEngine,
}

impl App {
    /// Creates a new App from already loaded settings.
    pub fn new(settings: EngineSettings) -> Result<Self, AppError> {
        let db = match &settings.database_path {
            Some(path) => Database::open(path)?,
            None => Database::open_in_memory()?,
        };
        let store = Arc::new(SqliteStore::new(db));
        let engine = BookmarkEngine::with_default_category_name(store, &settings.default_category_name);
        info!(
            database = settings.database_path.as_deref().unwrap_or(":memory:"),
            "markshelf ready"
        );
        Ok(Self { settings, engine })
    }

    /// Loads settings from `config_path` (defaults if absent), then opens the app.
    pub fn from_settings_file(config_path: &str) -> Result<Self, AppError> {
        let mut settings_engine = SettingsEngine::new(config_path);
        let settings = settings_engine.load()?;
        Self::new(settings)
    }

    /// An app backed by a fresh in-memory database.
    pub fn in_memory() -> Result<Self, AppError> {
        Self::new(EngineSettings::default())
    }

    pub fn bookmark_screen(&self) -> BookmarkScreen {
        BookmarkScreen::new(self.engine.clone())
    }

    pub fn browse_screen(&self) -> BrowseScreen {
        BrowseScreen::new(self.engine.clone())
    }
}
