//! Persistent recent-files and favorites store.
//!
//! Backed by a single-table sqlite database keyed by path. Writes are
//! serialized by a mutex around the connection; every committed write
//! recomputes the recent and favorites projections and pushes them over
//! `watch` channels, so subscribers see the current value immediately on
//! subscribe and every subsequent change without polling.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;
use tokio::sync::watch;

use crate::error::CoreResult;
use crate::fs::entry::FileEntry;

/// Default number of rows in the recent projection.
pub const DEFAULT_RECENT_LIMIT: u32 = 20;

/// One row of the store: a path the user opened, with its favorite flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentRecord {
    pub path: PathBuf,
    pub name: String,
    pub is_directory: bool,
    /// Last access time, epoch milliseconds.
    pub last_accessed: i64,
    pub is_favorite: bool,
    pub extension: String,
}

/// Durable store of recently opened entries and user favorites.
///
/// Constructed explicitly and passed to whoever needs it; there is no
/// global instance. Records survive restarts; rows are only removed by
/// [`RecentStore::remove`] or [`RecentStore::clear_history`] (which
/// spares favorites), never by an age policy.
pub struct RecentStore {
    conn: Mutex<Connection>,
    recent_limit: u32,
    recent_tx: watch::Sender<Vec<RecentRecord>>,
    favorites_tx: watch::Sender<Vec<RecentRecord>>,
}

impl RecentStore {
    /// Opens (creating if needed) the store at `db_path`.
    pub fn open(db_path: &Path, recent_limit: u32) -> CoreResult<Self> {
        Self::from_connection(Connection::open(db_path)?, recent_limit)
    }

    /// Opens a store that lives only as long as the process. Used in tests.
    pub fn open_in_memory(recent_limit: u32) -> CoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, recent_limit)
    }

    fn from_connection(conn: Connection, recent_limit: u32) -> CoreResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS recent_files (
                path          TEXT PRIMARY KEY,
                name          TEXT NOT NULL,
                is_directory  INTEGER NOT NULL,
                last_accessed INTEGER NOT NULL,
                is_favorite   INTEGER NOT NULL DEFAULT 0,
                extension     TEXT NOT NULL DEFAULT ''
            );",
        )?;

        let recent = query_recent(&conn, recent_limit)?;
        let favorites = query_favorites(&conn)?;
        let (recent_tx, _) = watch::channel(recent);
        let (favorites_tx, _) = watch::channel(favorites);

        Ok(Self {
            conn: Mutex::new(conn),
            recent_limit,
            recent_tx,
            favorites_tx,
        })
    }

    /// Records that `entry` was opened: inserts it, or refreshes
    /// `last_accessed` on the existing row. The favorite flag of an
    /// existing row is preserved.
    pub fn record_access(&self, entry: &FileEntry) -> CoreResult<()> {
        let now = epoch_millis();
        {
            let conn = self.lock_conn();
            conn.execute(
                "INSERT INTO recent_files (path, name, is_directory, last_accessed, is_favorite, extension)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5)
                 ON CONFLICT(path) DO UPDATE SET
                     name = excluded.name,
                     is_directory = excluded.is_directory,
                     last_accessed = excluded.last_accessed,
                     extension = excluded.extension",
                rusqlite::params![
                    entry.path().to_string_lossy(),
                    entry.name(),
                    entry.is_dir(),
                    now,
                    entry.extension(),
                ],
            )?;
        }
        self.publish()
    }

    /// Sets or clears the favorite flag on an already-recorded path.
    ///
    /// Returns whether a row existed. Unknown paths are not inserted:
    /// favoriting applies to entries the user has opened.
    pub fn set_favorite(&self, path: &Path, favorite: bool) -> CoreResult<bool> {
        let changed = {
            let conn = self.lock_conn();
            conn.execute(
                "UPDATE recent_files SET is_favorite = ?1 WHERE path = ?2",
                rusqlite::params![favorite, path.to_string_lossy()],
            )?
        };
        if changed > 0 {
            self.publish()?;
        }
        Ok(changed > 0)
    }

    /// The most recently accessed rows, newest first, at most `limit`.
    pub fn recent(&self, limit: u32) -> CoreResult<Vec<RecentRecord>> {
        query_recent(&self.lock_conn(), limit)
    }

    /// All favorite rows, ordered by name ascending.
    pub fn favorites(&self) -> CoreResult<Vec<RecentRecord>> {
        query_favorites(&self.lock_conn())
    }

    /// Removes a single row, favorite or not.
    pub fn remove(&self, path: &Path) -> CoreResult<()> {
        {
            let conn = self.lock_conn();
            conn.execute(
                "DELETE FROM recent_files WHERE path = ?1",
                rusqlite::params![path.to_string_lossy()],
            )?;
        }
        self.publish()
    }

    /// Deletes every non-favorite row. Favorites survive.
    pub fn clear_history(&self) -> CoreResult<()> {
        {
            let conn = self.lock_conn();
            conn.execute("DELETE FROM recent_files WHERE is_favorite = 0", [])?;
        }
        self.publish()
    }

    /// Subscribes to the recent projection. The receiver holds the
    /// current value immediately; subsequent committed writes push
    /// updated snapshots.
    pub fn subscribe_recent(&self) -> watch::Receiver<Vec<RecentRecord>> {
        self.recent_tx.subscribe()
    }

    /// Subscribes to the favorites projection.
    pub fn subscribe_favorites(&self) -> watch::Receiver<Vec<RecentRecord>> {
        self.favorites_tx.subscribe()
    }

    fn publish(&self) -> CoreResult<()> {
        let (recent, favorites) = {
            let conn = self.lock_conn();
            (query_recent(&conn, self.recent_limit)?, query_favorites(&conn)?)
        };
        // send_replace delivers even with zero receivers
        self.recent_tx.send_replace(recent);
        self.favorites_tx.send_replace(favorites);
        Ok(())
    }

    fn lock_conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A poisoned lock means a panicked writer; the connection itself
        // is still usable.
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn query_recent(conn: &Connection, limit: u32) -> CoreResult<Vec<RecentRecord>> {
    let mut stmt = conn.prepare(
        "SELECT path, name, is_directory, last_accessed, is_favorite, extension
         FROM recent_files ORDER BY last_accessed DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map([limit], row_to_record)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn query_favorites(conn: &Connection) -> CoreResult<Vec<RecentRecord>> {
    let mut stmt = conn.prepare(
        "SELECT path, name, is_directory, last_accessed, is_favorite, extension
         FROM recent_files WHERE is_favorite = 1 ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([], row_to_record)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecentRecord> {
    Ok(RecentRecord {
        path: PathBuf::from(row.get::<_, String>(0)?),
        name: row.get(1)?,
        is_directory: row.get(2)?,
        last_accessed: row.get(3)?,
        is_favorite: row.get(4)?,
        extension: row.get(5)?,
    })
}

fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
