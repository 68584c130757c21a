// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Database connection management.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{Error, Result};

/// SQLite connection to a Nix store metadata database.
///
/// The connection is `Send` but not `Sync`: share it between threads only
/// behind a lock.
pub struct StoreDb {
    pub(crate) conn: Connection,
}

impl StoreDb {
    /// Open an existing database read-only.
    ///
    /// Writes committed by other connections, including those still in the
    /// WAL, are visible to later queries.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::DatabaseNotFound(path.to_owned()));
        }

        let uri = format!("file:{}?mode=ro", path.display());
        let conn = Connection::open_with_flags(
            &uri,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;

        debug!("Opened store database at {}", path.display());
        Ok(Self { conn })
    }

    /// Check if the database has the `ValidPaths` table.
    pub fn has_schema(&self) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='ValidPaths'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(any(test, feature = "test"))]
impl StoreDb {
    /// Create a database file with the full schema.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;
        let db = Self { conn };
        db.create_schema()?;
        debug!("Created store database at {}", path.display());
        Ok(db)
    }

    /// Create an in-memory database with the full schema.
    pub fn open_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.create_schema()?;
        Ok(db)
    }

    /// Move every write out of the WAL into the database file.
    pub fn checkpoint(&self) -> Result<()> {
        self.conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }

    fn create_schema(&self) -> Result<()> {
        // Writes stay in the WAL until checkpointed, as in a live Nix database.
        self.conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA wal_autocheckpoint = 0;
             PRAGMA foreign_keys = ON;",
        )?;
        self.conn.execute_batch(crate::schema::SCHEMA_SQL)?;
        Ok(())
    }
}
