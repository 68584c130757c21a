// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Rust friendly access to a read-only Nix store.
//!
//! Every failure is reported as an [`Error`] whose variant says what kind of
//! failure it was; the engine's own error types never leak out.
//!
//! ```ignore
//! let store = libnixstore::Store::new()?;
//! let drv = store.parse_store_path("/nix/store/2qwfcpv54pb5l7nbyzg16rbd0xxc253d-hello.drv")?;
//! println!("{}", store.derivation_name(&drv)?);
//! ```

mod bridge;
pub mod error;

use std::sync::{Arc, OnceLock};

use nixstore_core::{Derivation, PathInfo, StorePath};
use nixstore_engine::{Settings, StoreEngine};
use tracing::{debug, instrument};

use crate::bridge::Bridge;
use crate::error::WireError;
pub use crate::error::{Error, ErrorTag, Result, TaggedError};

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Resolve the process-wide store settings from the environment.
///
/// Only the first successful call does any work; later calls return the
/// settings already in place.
///
/// # Errors
///
/// If the settings file can't be read or parsed.
pub fn initialize() -> Result<&'static Settings> {
    if let Some(settings) = SETTINGS.get() {
        return Ok(settings);
    }
    let settings = Settings::load().map_err(|e| Error::from(WireError::untagged(&e)))?;
    Ok(initialize_with(settings))
}

/// Install `settings` as the process-wide store settings, unless settings
/// are already in place.
pub fn initialize_with(settings: Settings) -> &'static Settings {
    let settings = SETTINGS.get_or_init(|| settings);
    debug!("Store settings initialized: {:?}", settings);
    settings
}

/// A validated store path and a snapshot of its metadata.
///
/// The snapshot is taken when the path is validated and never refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath(Arc<PathInfo>);

impl ValidatedPath {
    /// The path relative to the store directory: `<hash>-<name>`.
    pub fn relative_path(&self) -> String {
        self.0.path.to_string()
    }

    pub fn store_path(&self) -> &StorePath {
        &self.0.path
    }

    pub fn info(&self) -> &PathInfo {
        &self.0
    }
}

/// Handle on a Nix store.
///
/// `Store` is `Send` but not `Sync`; wrap it in a `Mutex` to share it
/// between threads. [`ValidatedPath`] values can be shared freely.
pub struct Store(Bridge);

impl Store {
    /// Open the store selected by the process-wide settings, initializing
    /// them first if needed.
    ///
    /// # Errors
    ///
    /// If the settings can't be resolved, or if the store can't be opened.
    #[instrument]
    pub fn new() -> Result<Self> {
        let settings = initialize()?;
        Self::open(settings)
    }

    /// Open the store selected by `settings`.
    ///
    /// # Errors
    ///
    /// If the store can't be opened.
    pub fn open(settings: &Settings) -> Result<Self> {
        Ok(Self(Bridge::open(settings)?))
    }

    /// Use `engine` to answer queries.
    pub fn from_engine(engine: impl StoreEngine + Send + 'static) -> Self {
        Self(Bridge::from_engine(Box::new(engine)))
    }

    /// Get the store version
    ///
    /// # Errors
    ///
    /// [`Error::GetVersion`] if the engine can't report a version.
    #[instrument(skip_all)]
    pub fn version(&self) -> Result<String> {
        Ok(self.0.get_version()?)
    }

    /// Parse and validate a store path
    ///
    /// # Errors
    ///
    /// [`Error::StorePath`] if the path is not a path in the store, or if it
    /// doesn't reference a valid store object.
    #[instrument(skip_all)]
    pub fn parse_store_path<T: AsRef<[u8]>>(&self, path: T) -> Result<ValidatedPath> {
        let info = self.0.parse_store_path(path.as_ref())?;
        Ok(ValidatedPath(info))
    }

    /// Fetch the name of a derivation.
    ///
    /// # Errors
    ///
    /// [`Error::StorePath`] if the derivation can't be read.
    #[instrument(skip_all)]
    pub fn derivation_name(&self, drv_path: &ValidatedPath) -> Result<String> {
        Ok(self.0.get_derivation_name(drv_path.store_path())?)
    }

    /// Fetch a value from the environment of the derivation at `drv_path`.
    ///
    /// # Errors
    ///
    /// [`Error::EnvKeyDoesNotExist`] if there is no binding for `key`,
    /// [`Error::StorePath`] if the derivation can't be read.
    #[instrument(skip_all)]
    pub fn derivation_env_val(&self, drv_path: &ValidatedPath, key: &str) -> Result<String> {
        Ok(self.0.get_derivation_env_val(drv_path.store_path(), key)?)
    }

    /// Like [`Store::derivation_env_val`], with a missing key reported as
    /// `None`.
    ///
    /// # Errors
    ///
    /// [`Error::StorePath`] if the derivation can't be read.
    #[instrument(skip_all)]
    pub fn try_derivation_env_val(
        &self,
        drv_path: &ValidatedPath,
        key: &str,
    ) -> Result<Option<String>> {
        match self.derivation_env_val(drv_path, key) {
            Ok(value) => Ok(Some(value)),
            Err(Error::EnvKeyDoesNotExist(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Read the whole derivation at `drv_path`.
    ///
    /// # Errors
    ///
    /// [`Error::StorePath`] if the derivation can't be read.
    #[instrument(skip_all)]
    pub fn read_derivation(&self, drv_path: &ValidatedPath) -> Result<Derivation> {
        Ok(self.0.read_derivation(drv_path.store_path())?)
    }

    /// Fetch the "store relative" path of the object referenced by
    /// `store_path`
    #[instrument(skip_all)]
    pub fn store_relative_path(&self, store_path: &ValidatedPath) -> String {
        self.0.get_store_relative_path(store_path.store_path())
    }
}
