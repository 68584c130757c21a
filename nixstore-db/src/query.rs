// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Lookups against `ValidPaths` and `Refs`.

use std::collections::BTreeSet;

use rusqlite::{OptionalExtension, Row, named_params};

use crate::connection::StoreDb;
use crate::error::Result;
use crate::types::{PathRow, from_unix_secs};

const SELECT_PATH: &str = "SELECT id, path, hash, registrationTime, deriver, narSize, ultimate, sigs, ca
     FROM ValidPaths WHERE path = :path";

const SELECT_REFERENCES: &str = "SELECT ValidPaths.path FROM Refs
     JOIN ValidPaths ON Refs.reference = ValidPaths.id
     WHERE Refs.referrer = :referrer";

fn path_row(row: &Row<'_>) -> rusqlite::Result<PathRow> {
    Ok(PathRow {
        id: row.get("id")?,
        path: row.get("path")?,
        hash: row.get("hash")?,
        registration_time: from_unix_secs(row.get("registrationTime")?),
        deriver: row.get("deriver")?,
        nar_size: row
            .get::<_, Option<i64>>("narSize")?
            .and_then(|n| u64::try_from(n).ok()),
        ultimate: row.get::<_, Option<i64>>("ultimate")?.is_some_and(|u| u != 0),
        sigs: row.get("sigs")?,
        ca: row.get("ca")?,
        references: BTreeSet::new(),
    })
}

impl StoreDb {
    /// Look up the row for an absolute store path.
    ///
    /// Returns `None` if the path is not valid.
    pub fn query_path_info(&self, path: &str) -> Result<Option<PathRow>> {
        let row = self
            .conn
            .prepare_cached(SELECT_PATH)?
            .query_row(named_params! { ":path": path }, path_row)
            .optional()?;

        let Some(mut row) = row else {
            return Ok(None);
        };
        row.references = self.references(row.id)?;
        Ok(Some(row))
    }

    fn references(&self, referrer: i64) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare_cached(SELECT_REFERENCES)?;
        let paths = stmt
            .query_map(named_params! { ":referrer": referrer }, |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;
        Ok(paths)
    }
}
