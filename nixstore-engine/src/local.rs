// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Store engine backed by a store on the local filesystem.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use nixstore_core::{Derivation, PathInfo, StoreDir, StorePath, aterm};
use nixstore_db::{PathRow, StoreDb};
use tracing::debug;

use crate::StoreEngine;
use crate::config::{Settings, StoreUri};
use crate::error::{EngineError, IoContext, Result};

/// Version reported by this engine.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A local store: metadata from the SQLite database, derivations from the
/// `.drv` files in the store directory.
pub struct LocalStore {
    store_dir: StoreDir,
    real_store_dir: PathBuf,
    db: StoreDb,
}

impl LocalStore {
    /// Open the local store selected by `settings`.
    pub fn open(settings: &Settings) -> Result<Self> {
        let store_dir = settings.store_dir()?;
        let StoreUri::Local { root } = settings.store_uri()?;

        let (real_store_dir, state_dir) = match root {
            Some(root) => (
                reroot(&root, &settings.store_dir),
                reroot(&root, &settings.state_dir),
            ),
            None => (settings.store_dir.clone(), settings.state_dir.clone()),
        };

        Self::open_at(store_dir, real_store_dir, &state_dir)
    }

    /// Open a store whose files live in `real_store_dir` and whose database
    /// lives below `state_dir`.
    pub fn open_at(store_dir: StoreDir, real_store_dir: PathBuf, state_dir: &Path) -> Result<Self> {
        let db_path = Settings::db_path(state_dir);
        let db = StoreDb::open_read_only(&db_path)?;
        if !db.has_schema()? {
            return Err(EngineError::MissingSchema(db_path));
        }

        debug!(
            "Opened local store {} (files in {}, database {})",
            store_dir,
            real_store_dir.display(),
            db_path.display()
        );
        Ok(Self {
            store_dir,
            real_store_dir,
            db,
        })
    }

    /// Directory the store's files actually live in.
    pub fn real_store_dir(&self) -> &Path {
        &self.real_store_dir
    }

    fn parse_recorded_path(&self, recorded: &str, path: &StorePath) -> Result<StorePath> {
        self.store_dir
            .parse_absolute(recorded)
            .map_err(|source| EngineError::CorruptMetadata {
                path: self.store_dir.display(path).to_string(),
                source,
            })
    }

    fn path_info_from_row(&self, path: &StorePath, row: PathRow) -> Result<PathInfo> {
        let deriver = row
            .deriver
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| self.parse_recorded_path(d, path))
            .transpose()?;
        let references = row
            .references
            .iter()
            .map(|r| self.parse_recorded_path(r, path))
            .collect::<Result<BTreeSet<_>>>()?;

        Ok(PathInfo {
            path: path.clone(),
            signatures: row.signatures().map(str::to_owned).collect(),
            nar_hash: row.hash,
            nar_size: row.nar_size,
            deriver,
            references,
            ca: row.ca,
            registration_time: row.registration_time,
            ultimate: row.ultimate,
        })
    }
}

fn reroot(root: &Path, path: &Path) -> PathBuf {
    root.join(path.strip_prefix("/").unwrap_or(path))
}

impl StoreEngine for LocalStore {
    fn store_dir(&self) -> &StoreDir {
        &self.store_dir
    }

    fn version(&self) -> Result<Option<String>> {
        Ok(Some(ENGINE_VERSION.to_string()))
    }

    fn query_path_info(&self, path: &StorePath) -> Result<Option<PathInfo>> {
        let printed = self.store_dir.display(path).to_string();
        match self.db.query_path_info(&printed)? {
            Some(row) => Ok(Some(self.path_info_from_row(path, row)?)),
            None => Ok(None),
        }
    }

    fn read_derivation(&self, path: &StorePath) -> Result<Derivation> {
        let printed = self.store_dir.display(path).to_string();
        let name = Derivation::name_from_path(path)
            .ok_or_else(|| EngineError::NotADerivation(printed.clone()))?;

        let file = self.real_store_dir.join(path.to_string());
        let contents = std::fs::read_to_string(&file)
            .io_context(|| format!("reading derivation '{printed}'"))?;

        aterm::parse(&self.store_dir, &contents, name).map_err(|source| {
            EngineError::BadDerivation {
                path: printed,
                source,
            }
        })
    }
}
