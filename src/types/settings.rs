use serde::{Deserialize, Serialize};

use super::category::DEFAULT_CATEGORY_NAME;

/// Top-level engine settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// SQLite database file. `None` keeps everything in memory.
    pub database_path: Option<String>,
    /// Name given to the category recreated when none exist.
    pub default_category_name: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            default_category_name: DEFAULT_CATEGORY_NAME.to_string(),
        }
    }
}
