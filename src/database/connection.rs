//! SQLite connection ownership for Markshelf.

use rusqlite::Connection;
use std::path::Path;

use tracing::debug;

use super::migrations;

/// Owns a `rusqlite::Connection` whose schema is guaranteed current.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the bookmark database at `path`.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the file cannot be opened or a migration fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        debug!(path = %path.as_ref().display(), "opening bookmark database");
        Self::migrated(Connection::open(path)?)
    }

    /// A private database that disappears on drop.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::migrated(Connection::open_in_memory()?)
    }

    fn migrated(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        debug!(
            schema_version = migrations::get_schema_version(&conn),
            "bookmark schema ready"
        );
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Mutable access, needed to open transactions.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
