// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use nixstore_core::{ATermError, StorePathError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    BadStorePath(#[from] StorePathError),

    #[error("'{0}' is not a derivation")]
    NotADerivation(String),

    #[error("error parsing derivation '{path}': {source}")]
    BadDerivation {
        path: String,
        #[source]
        source: ATermError,
    },

    #[error("store database has corrupt metadata for '{path}': {source}")]
    CorruptMetadata {
        path: String,
        #[source]
        source: StorePathError,
    },

    #[error("store database error: {0}")]
    StoreDb(#[from] nixstore_db::Error),

    #[error("'{0}' is not a Nix store database")]
    MissingSchema(PathBuf),

    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("don't know how to open Nix store with URI '{0}'")]
    UnsupportedStore(String),

    #[error("invalid store URI '{uri}': {reason}")]
    InvalidStoreUri { uri: String, reason: String },

    #[error("invalid store directory: {0}")]
    InvalidStoreDir(#[source] StorePathError),
}

impl EngineError {
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }
}

/// Helper trait for adding context to IO errors
pub trait IoContext<T> {
    fn io_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| EngineError::io(f(), e))
    }
}
