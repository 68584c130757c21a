// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Engine settings and store URI resolution.
//!
//! Settings are resolved in three layers: built-in defaults, an optional TOML
//! file named by `NIXSTORE_CONFIG`, then the environment variables Nix itself
//! honours (`NIX_REMOTE`, `NIX_STORE_DIR`, `NIX_STATE_DIR`).

use std::path::{Path, PathBuf};
use std::str::FromStr;

use nixstore_core::StoreDir;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming an optional TOML settings file.
pub const CONFIG_FILE_ENV: &str = "NIXSTORE_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Store URI: `auto`, `local` or `local?root=<dir>`
    pub store: String,

    /// Logical store directory paths are parsed against
    pub store_dir: PathBuf,

    /// Nix state directory holding `db/db.sqlite`
    pub state_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: "auto".to_string(),
            store_dir: PathBuf::from("/nix/store"),
            state_dir: PathBuf::from("/nix/var/nix"),
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Resolve settings using `lookup` in place of the process environment.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup(CONFIG_FILE_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(store) = lookup("NIX_REMOTE").filter(|s| !s.is_empty()) {
            settings.store = store;
        }
        if let Some(dir) = lookup("NIX_STORE_DIR").filter(|s| !s.is_empty()) {
            settings.store_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("NIX_STATE_DIR").filter(|s| !s.is_empty()) {
            settings.state_dir = PathBuf::from(dir);
        }

        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_owned(),
            source: e,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn store_uri(&self) -> Result<StoreUri, ConfigError> {
        self.store.parse()
    }

    pub fn store_dir(&self) -> Result<StoreDir, ConfigError> {
        StoreDir::new(self.store_dir.to_string_lossy()).map_err(ConfigError::InvalidStoreDir)
    }

    /// Path of the metadata database below `state_dir`.
    pub fn db_path(state_dir: &Path) -> PathBuf {
        state_dir.join("db").join("db.sqlite")
    }
}

/// Where the store lives, as selected by the store URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUri {
    /// A store on the local filesystem, optionally below a chroot directory.
    Local { root: Option<PathBuf> },
}

impl FromStr for StoreUri {
    type Err = ConfigError;

    fn from_str(uri: &str) -> Result<Self, Self::Err> {
        let (scheme, query) = match uri.split_once('?') {
            Some((scheme, query)) => (scheme, Some(query)),
            None => (uri, None),
        };

        if !matches!(scheme, "auto" | "local") {
            return Err(ConfigError::UnsupportedStore(uri.to_string()));
        }

        let mut root = None;
        for param in query.into_iter().flat_map(|q| q.split('&')) {
            match param.split_once('=') {
                Some(("root", value)) if value.starts_with('/') => {
                    root = Some(PathBuf::from(value));
                }
                Some(("root", _)) => {
                    return Err(ConfigError::InvalidStoreUri {
                        uri: uri.to_string(),
                        reason: "root must be an absolute path".to_string(),
                    });
                }
                _ => {
                    return Err(ConfigError::InvalidStoreUri {
                        uri: uri.to_string(),
                        reason: format!("unsupported parameter '{param}'"),
                    });
                }
            }
        }

        Ok(Self::Local { root })
    }
}
