// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Inserting paths, for building fixture databases.

use std::collections::BTreeSet;
use std::time::SystemTime;

use rusqlite::named_params;

use crate::connection::StoreDb;
use crate::error::Result;
use crate::types::to_unix_secs;

/// A path to insert into `ValidPaths`.
#[derive(Debug, Clone)]
pub struct NewPath {
    pub path: String,
    pub hash: String,
    pub registration_time: SystemTime,
    pub deriver: Option<String>,
    pub nar_size: Option<u64>,
    pub ultimate: bool,
    pub sigs: Option<String>,
    pub ca: Option<String>,
    /// Referenced paths; those not in the database yet are dropped
    pub references: BTreeSet<String>,
}

impl NewPath {
    pub fn new(path: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hash: hash.into(),
            registration_time: SystemTime::now(),
            deriver: None,
            nar_size: None,
            ultimate: false,
            sigs: None,
            ca: None,
            references: BTreeSet::new(),
        }
    }
}

impl StoreDb {
    /// Insert `new` and its references in one transaction, returning the
    /// row ID.
    pub fn insert_path(&mut self, new: &NewPath) -> Result<i64> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO ValidPaths (path, hash, registrationTime, deriver, narSize, ultimate, sigs, ca)
             VALUES (:path, :hash, :time, :deriver, :nar_size, :ultimate, :sigs, :ca)",
            named_params! {
                ":path": new.path,
                ":hash": new.hash,
                ":time": to_unix_secs(new.registration_time),
                ":deriver": new.deriver,
                ":nar_size": new.nar_size.and_then(|n| i64::try_from(n).ok()),
                ":ultimate": new.ultimate,
                ":sigs": new.sigs,
                ":ca": new.ca,
            },
        )?;
        let id = tx.last_insert_rowid();

        {
            let mut refs = tx.prepare(
                "INSERT OR IGNORE INTO Refs (referrer, reference)
                 SELECT :referrer, id FROM ValidPaths WHERE path = :reference",
            )?;
            for reference in &new.references {
                refs.execute(named_params! { ":referrer": id, ":reference": reference })?;
            }
        }

        tx.commit()?;
        Ok(id)
    }
}
