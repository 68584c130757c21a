// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Engine-facing side of the boundary.
//!
//! Every operation here reports failure as a [`WireError`]; nothing from the
//! engine's own error types leaves this module.

use std::sync::Arc;

use nixstore_core::{Derivation, PathInfo, StorePath};
use nixstore_engine::{Settings, StoreEngine};

use crate::error::{ErrorTag, TaggedError, WireError};
use crate::tagged;

type WireResult<T> = std::result::Result<T, WireError>;

pub(crate) struct Bridge {
    engine: Box<dyn StoreEngine + Send>,
}

impl Bridge {
    pub(crate) fn open(settings: &Settings) -> WireResult<Self> {
        let engine = nixstore_engine::open_store(settings).map_err(|e| WireError::untagged(&e))?;
        Ok(Self { engine })
    }

    pub(crate) fn from_engine(engine: Box<dyn StoreEngine + Send>) -> Self {
        Self { engine }
    }

    pub(crate) fn get_version(&self) -> WireResult<String> {
        match self.engine.version() {
            Ok(Some(version)) if !version.is_empty() => Ok(version),
            Ok(_) => Err(tagged!(ErrorTag::GetVersion, "store did not report a version").into()),
            Err(e) => Err(TaggedError::wrap(ErrorTag::GetVersion, &e).into()),
        }
    }

    /// Parse `path` and check that it is valid in the store.
    pub(crate) fn parse_store_path(&self, path: &[u8]) -> WireResult<Arc<PathInfo>> {
        let path = std::str::from_utf8(path).map_err(|e| {
            tagged!(
                ErrorTag::StorePath,
                "path '{}' is not valid UTF-8: {e}",
                String::from_utf8_lossy(path)
            )
        })?;
        let store_path = self
            .engine
            .parse_store_path(path)
            .map_err(|e| TaggedError::wrap(ErrorTag::StorePath, &e))?;

        match self.engine.query_path_info(&store_path) {
            Ok(Some(info)) => Ok(Arc::new(info)),
            Ok(None) => Err(tagged!(
                ErrorTag::StorePath,
                "path '{}' is not valid",
                self.engine.store_dir().display(&store_path)
            )
            .into()),
            Err(e) => Err(TaggedError::wrap(ErrorTag::StorePath, &e).into()),
        }
    }

    pub(crate) fn read_derivation(&self, path: &StorePath) -> WireResult<Derivation> {
        self.engine
            .read_derivation(path)
            .map_err(|e| TaggedError::wrap(ErrorTag::StorePath, &e).into())
    }

    pub(crate) fn get_derivation_name(&self, path: &StorePath) -> WireResult<String> {
        Ok(self.read_derivation(path)?.name)
    }

    pub(crate) fn get_derivation_env_val(&self, path: &StorePath, key: &str) -> WireResult<String> {
        let drv = self.read_derivation(path)?;
        drv.env_var(key).map(str::to_owned).ok_or_else(|| {
            tagged!(
                ErrorTag::EnvKeyDoesNotExist,
                "derivation environment value for key '{key}' doesn't exist"
            )
            .into()
        })
    }

    pub(crate) fn get_store_relative_path(&self, path: &StorePath) -> String {
        path.to_string()
    }
}
