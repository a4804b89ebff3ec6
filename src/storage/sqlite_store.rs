//! SQLite implementation of [`BookmarkStore`].
//!
//! A single connection lives behind a mutex; every query runs on tokio's
//! blocking pool so callers on the event thread only ever await.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::watch;
use tracing::debug;

use super::change_feed::{ChangeNotifier, Table, TableVersions};
use super::BookmarkStore;
use crate::database::Database;
use crate::types::bookmark::{Bookmark, BookmarkId};
use crate::types::category::{Category, CategoryId, CategoryWithBookmarks};
use crate::types::errors::StoreError;

const CATEGORY_COLUMNS: &str = "id, name";
const BOOKMARK_COLUMNS: &str = "id, category_id, title, url";

/// Bookmark store backed by a SQLite [`Database`].
pub struct SqliteStore {
    db: Arc<Mutex<Database>>,
    notifier: ChangeNotifier,
}

impl SqliteStore {
    /// Wraps an already migrated database.
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Opens a fresh in-memory store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn call<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let mut guard = db.lock().map_err(|_| StoreError::LockPoisoned)?;
            f(guard.connection_mut())
        })
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?
    }

    fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: CategoryId(row.get(0)?),
            name: row.get(1)?,
        })
    }

    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: BookmarkId(row.get(0)?),
            category_id: CategoryId(row.get(1)?),
            title: row.get(2)?,
            url: row.get(3)?,
        })
    }

    fn query_categories(conn: &Connection) -> Result<Vec<Category>, StoreError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([], Self::row_to_category)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn query_bookmarks_by_category(
        conn: &Connection,
        id: CategoryId,
    ) -> Result<Vec<Bookmark>, StoreError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE category_id = ?1 ORDER BY id DESC"
        ))?;
        let rows = stmt.query_map(params![id.0], Self::row_to_bookmark)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Announces a write if it touched at least one row.
    fn notify_if(&self, affected: usize, tables: &[Table]) {
        if affected > 0 {
            self.notifier.touch(tables);
        }
    }
}

#[async_trait]
impl BookmarkStore for SqliteStore {
    async fn insert_category(&self, name: &str) -> Result<CategoryId, StoreError> {
        let name = name.to_string();
        let id = self
            .call(move |conn| {
                conn.execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
                Ok(CategoryId(conn.last_insert_rowid()))
            })
            .await?;
        debug!(category_id = %id, "category inserted");
        self.notifier.touch(&[Table::Categories]);
        Ok(id)
    }

    async fn insert_category_if_none(&self, name: &str) -> Result<Option<CategoryId>, StoreError> {
        let name = name.to_string();
        let id = self
            .call(move |conn| {
                let affected = conn.execute(
                    "INSERT INTO categories (name) \
                     SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM categories)",
                    params![name],
                )?;
                Ok((affected > 0).then(|| CategoryId(conn.last_insert_rowid())))
            })
            .await?;
        if let Some(id) = id {
            debug!(category_id = %id, "category inserted into empty table");
            self.notifier.touch(&[Table::Categories]);
        }
        Ok(id)
    }

    async fn find_or_insert_category(&self, name: &str) -> Result<(CategoryId, bool), StoreError> {
        let name = name.to_string();
        let (id, inserted) = self
            .call(move |conn| {
                let tx = conn.transaction()?;
                let inserted = tx.execute(
                    "INSERT INTO categories (name) \
                     SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM categories WHERE name = ?1)",
                    params![name],
                )? > 0;
                let id: i64 = tx.query_row(
                    "SELECT MIN(id) FROM categories WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )?;
                tx.commit()?;
                Ok((CategoryId(id), inserted))
            })
            .await?;
        if inserted {
            debug!(category_id = %id, "category inserted by name");
            self.notifier.touch(&[Table::Categories]);
        }
        Ok((id, inserted))
    }

    async fn update_category(&self, category: &Category) -> Result<(), StoreError> {
        let category = category.clone();
        let affected = self
            .call(move |conn| {
                Ok(conn.execute(
                    "UPDATE categories SET name = ?1 WHERE id = ?2",
                    params![category.name, category.id.0],
                )?)
            })
            .await?;
        self.notify_if(affected, &[Table::Categories]);
        Ok(())
    }

    async fn delete_category(&self, category: &Category) -> Result<(), StoreError> {
        let id = category.id;
        let (affected, cascaded) = self
            .call(move |conn| {
                let tx = conn.transaction()?;
                let cascaded: i64 = tx.query_row(
                    "SELECT COUNT(*) FROM bookmarks WHERE category_id = ?1",
                    params![id.0],
                    |row| row.get(0),
                )?;
                // Bookmarks go with the category via ON DELETE CASCADE.
                let affected = tx.execute("DELETE FROM categories WHERE id = ?1", params![id.0])?;
                tx.commit()?;
                Ok((affected, cascaded))
            })
            .await?;
        if affected > 0 {
            debug!(category_id = %id, cascaded, "category deleted");
        }
        self.notify_if(affected, &[Table::Categories, Table::Bookmarks]);
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.call(|conn| Self::query_categories(conn)).await
    }

    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        self.call(move |conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1 LIMIT 1"),
                    params![id.0],
                    Self::row_to_category,
                )
                .optional()?)
        })
        .await
    }

    async fn insert_bookmark(
        &self,
        title: &str,
        url: &str,
        category_id: CategoryId,
    ) -> Result<BookmarkId, StoreError> {
        let title = title.to_string();
        let url = url.to_string();
        let id = self
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO bookmarks (category_id, title, url) VALUES (?1, ?2, ?3)",
                    params![category_id.0, title, url],
                )?;
                Ok(BookmarkId(conn.last_insert_rowid()))
            })
            .await?;
        debug!(bookmark_id = %id, %category_id, "bookmark inserted");
        self.notifier.touch(&[Table::Bookmarks]);
        Ok(id)
    }

    async fn update_bookmark(&self, bookmark: &Bookmark) -> Result<(), StoreError> {
        let bookmark = bookmark.clone();
        let affected = self
            .call(move |conn| {
                Ok(conn.execute(
                    "UPDATE bookmarks SET category_id = ?1, title = ?2, url = ?3 WHERE id = ?4",
                    params![bookmark.category_id.0, bookmark.title, bookmark.url, bookmark.id.0],
                )?)
            })
            .await?;
        self.notify_if(affected, &[Table::Bookmarks]);
        Ok(())
    }

    async fn delete_bookmark(&self, bookmark: &Bookmark) -> Result<(), StoreError> {
        let id = bookmark.id;
        let affected = self
            .call(move |conn| Ok(conn.execute("DELETE FROM bookmarks WHERE id = ?1", params![id.0])?))
            .await?;
        self.notify_if(affected, &[Table::Bookmarks]);
        Ok(())
    }

    async fn find_bookmark_by_url(&self, url: &str) -> Result<Option<Bookmark>, StoreError> {
        let url = url.to_string();
        self.call(move |conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE url = ?1 LIMIT 1"),
                    params![url],
                    Self::row_to_bookmark,
                )
                .optional()?)
        })
        .await
    }

    async fn find_bookmark_by_id(&self, id: BookmarkId) -> Result<Option<Bookmark>, StoreError> {
        self.call(move |conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = ?1 LIMIT 1"),
                    params![id.0],
                    Self::row_to_bookmark,
                )
                .optional()?)
        })
        .await
    }

    async fn list_bookmarks_by_category(&self, id: CategoryId) -> Result<Vec<Bookmark>, StoreError> {
        self.call(move |conn| Self::query_bookmarks_by_category(conn, id))
            .await
    }

    async fn list_categories_with_bookmarks(&self) -> Result<Vec<CategoryWithBookmarks>, StoreError> {
        self.call(|conn| {
            let tx = conn.transaction()?;
            let categories = Self::query_categories(&tx)?;
            let mut grouped = Vec::with_capacity(categories.len());
            for category in categories {
                let bookmarks = Self::query_bookmarks_by_category(&tx, category.id)?;
                grouped.push(CategoryWithBookmarks { category, bookmarks });
            }
            tx.commit()?;
            Ok(grouped)
        })
        .await
    }

    fn changes(&self) -> watch::Receiver<TableVersions> {
        self.notifier.subscribe()
    }
}
