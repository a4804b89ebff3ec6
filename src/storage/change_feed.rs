//! Per-table change notification.

use tokio::sync::watch;

/// A persisted table whose writes are announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Categories,
    Bookmarks,
}

/// Monotonic write counters, one per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableVersions {
    pub categories: u64,
    pub bookmarks: u64,
}

impl TableVersions {
    pub fn get(&self, table: Table) -> u64 {
        match table {
            Table::Categories => self.categories,
            Table::Bookmarks => self.bookmarks,
        }
    }

    /// Returns `true` if any of `tables` moved between `self` and `newer`.
    pub fn changed_since(&self, newer: &TableVersions, tables: &[Table]) -> bool {
        tables.iter().any(|t| self.get(*t) != newer.get(*t))
    }
}

/// Publishes [`TableVersions`] to any number of subscribers.
///
/// Backed by a `watch` channel: slow subscribers may skip intermediate
/// versions but always observe the latest one.
#[derive(Debug)]
pub struct ChangeNotifier {
    tx: watch::Sender<TableVersions>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(TableVersions::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<TableVersions> {
        self.tx.subscribe()
    }

    /// Bumps the version of every table in `tables` in a single update.
    pub fn touch(&self, tables: &[Table]) {
        self.tx.send_modify(|versions| {
            for table in tables {
                match table {
                    Table::Categories => versions.categories += 1,
                    Table::Bookmarks => versions.bookmarks += 1,
                }
            }
        });
    }

    pub fn current(&self) -> TableVersions {
        *self.tx.borrow()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}
