//! Unit tests for the Markshelf database layer (connection + migrations).

use markshelf::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use markshelf::database::Database;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    for table in &["categories", "bookmarks", "schema_version"] {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_migrations_create_indexes() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    for index in &["idx_bookmarks_category_id", "idx_bookmarks_url"] {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name=?1",
                [index],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Index '{}' should exist after migrations", index);
    }
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let result = markshelf::database::migrations::run_all(db.connection());
    assert!(result.is_ok(), "Running migrations twice should succeed (idempotent)");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_foreign_keys_enabled() {
    let db = Database::open_in_memory().unwrap();
    let enabled: i64 = db
        .connection()
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn test_deleting_category_cascades_to_bookmarks() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    conn.execute_batch(
        "INSERT INTO categories (id, name) VALUES (1, 'A'), (2, 'B');
         INSERT INTO bookmarks (category_id, title, url) VALUES (1, 'a1', 'https://a1'), (1, 'a2', 'https://a2'), (2, 'b1', 'https://b1');
         DELETE FROM categories WHERE id = 1;",
    )
    .unwrap();

    let remaining: Vec<String> = conn
        .prepare("SELECT url FROM bookmarks ORDER BY id")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(remaining, vec!["https://b1".to_string()]);
}

#[test]
fn test_bookmark_url_is_unique() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    conn.execute("INSERT INTO categories (name) VALUES ('A')", []).unwrap();
    conn.execute(
        "INSERT INTO bookmarks (category_id, title, url) VALUES (1, 'x', 'https://x')",
        [],
    )
    .unwrap();
    let second = conn.execute(
        "INSERT INTO bookmarks (category_id, title, url) VALUES (1, 'y', 'https://x')",
        [],
    );
    assert!(second.is_err());
}

#[test]
fn test_open_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("marks.db");

    {
        let db = Database::open(&db_path).expect("Should open file database");
        db.connection()
            .execute("INSERT INTO categories (name) VALUES ('Work')", [])
            .unwrap();
    }

    let db = Database::open(&db_path).expect("Should reopen file database");
    let name: String = db
        .connection()
        .query_row("SELECT name FROM categories", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "Work");
}
