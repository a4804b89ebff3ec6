//! Integration-level unit tests for the SettingsEngine public API and the
//! App wiring that consumes it.

use markshelf::app::App;
use markshelf::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use markshelf::types::category::DEFAULT_CATEGORY_NAME;
use markshelf::types::settings::EngineSettings;
use tempfile::TempDir;

/// Helper: a SettingsEngine whose file lives in `dir`.
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(path)
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(
        settings,
        EngineSettings::default(),
        "Loading without a config file must return default settings"
    );
}

#[test]
fn test_set_value_persists_changes() {
    let dir = TempDir::new().unwrap();

    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine
            .set_value("default_category_name", serde_json::json!("Inbox"))
            .unwrap();
    }

    let mut engine2 = engine_in_temp(&dir);
    let loaded = engine2.load().unwrap();
    assert_eq!(loaded.default_category_name, "Inbox");
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine
        .set_value("database_path", serde_json::json!("/tmp/elsewhere.db"))
        .unwrap();

    engine.reset().unwrap();
    assert_eq!(*engine.get_settings(), EngineSettings::default());

    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(reloaded.load().unwrap(), EngineSettings::default());
}

#[test]
fn test_set_value_unknown_or_empty_key() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    assert!(engine.set_value("nonexistent", serde_json::json!(true)).is_err());
    assert!(engine.set_value("", serde_json::json!(true)).is_err());
}

#[test]
fn test_set_value_wrong_type_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    let result = engine.set_value("default_category_name", serde_json::json!(42));
    assert!(result.is_err());
    assert_eq!(engine.get_settings().default_category_name, DEFAULT_CATEGORY_NAME);
}

#[test]
fn test_load_malformed_json() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    std::fs::write(engine.get_config_path(), "{ invalid json }").unwrap();
    assert!(engine.load().is_err());
}

#[tokio::test]
async fn test_app_uses_configured_database_and_default_name() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("marks.db").to_string_lossy().to_string();
    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine.set_value("database_path", serde_json::json!(db_path)).unwrap();
        engine
            .set_value("default_category_name", serde_json::json!("Inbox"))
            .unwrap();
    }
    let config_path = dir.path().join("settings.json").to_string_lossy().to_string();

    {
        let app = App::from_settings_file(&config_path).unwrap();
        let categories = app.engine.categories().await.unwrap();
        assert_eq!(categories[0].name, "Inbox");
        app.engine
            .save_bookmark("Example", "https://example.com", categories[0].id)
            .await;
    }

    let reopened = App::from_settings_file(&config_path).unwrap();
    assert!(reopened
        .engine
        .is_bookmark_registered("https://example.com")
        .await
        .unwrap());
}
