//! Schema migrations for the Markshelf SQLite database.
//!
//! Applied migrations are recorded in `schema_version`; each one runs once
//! per database file.

use rusqlite::Connection;

/// Schema version written by the newest migration below.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Highest applied migration, or 0 on a database that has none.
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i32>>(0)
    })
    .ok()
    .flatten()
    .unwrap_or(0)
}

/// Brings the connection's schema up to [`CURRENT_SCHEMA_VERSION`].
///
/// `foreign_keys` is a per-connection pragma, so it is switched on here on
/// every open: deleting a category relies on `ON DELETE CASCADE` to take its
/// bookmarks with it, and a bookmark pointing at a missing category must be
/// rejected by the database.
///
/// # Errors
/// Returns `rusqlite::Error` if a pragma or migration statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    if get_schema_version(conn) < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "categories and bookmarks")?;
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let applied_at = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0);
    conn.execute(
        "INSERT INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, applied_at, description],
    )?;
    Ok(())
}

/// V1: categories and category-scoped bookmarks with a globally unique url.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS bookmarks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_bookmarks_category_id ON bookmarks(category_id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_bookmarks_url ON bookmarks(url);
        ",
    )
}
