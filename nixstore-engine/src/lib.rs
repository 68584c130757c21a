// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Read-only Nix store engine.
//!
//! [`StoreEngine`] is the narrow query surface the boundary crate relies on:
//! parse a path, query its metadata, read a derivation and report a version.
//! [`LocalStore`] answers it from a store on the local filesystem.

pub mod config;
pub mod error;
pub mod local;

use nixstore_core::{Derivation, PathInfo, StoreDir, StorePath};
use tracing::debug;

pub use config::{Settings, StoreUri};
pub use error::{ConfigError, EngineError, Result};
pub use local::LocalStore;

/// Read-only queries against a Nix store.
pub trait StoreEngine {
    /// Store directory paths are parsed against and printed with.
    fn store_dir(&self) -> &StoreDir;

    /// Version of the engine, if it can report one.
    fn version(&self) -> Result<Option<String>>;

    /// Parse an absolute store path or a store-relative base name.
    fn parse_store_path(&self, path: &str) -> Result<StorePath> {
        Ok(self.store_dir().parse_path(path)?)
    }

    /// Metadata for `path`, or `None` if the path is not valid.
    fn query_path_info(&self, path: &StorePath) -> Result<Option<PathInfo>>;

    /// Read and parse the derivation stored at `path`.
    fn read_derivation(&self, path: &StorePath) -> Result<Derivation>;
}

/// Open the engine selected by `settings`.
pub fn open_store(settings: &Settings) -> Result<Box<dyn StoreEngine + Send>> {
    debug!("Opening store '{}'", settings.store);
    match settings.store_uri()? {
        StoreUri::Local { .. } => Ok(Box::new(LocalStore::open(settings)?)),
    }
}
