// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nixstore_engine::Settings;

/// Query store paths and derivations in a Nix store
#[derive(Parser, Debug)]
#[command(name = "nixstore-query")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Store URI (`auto`, `local` or `local?root=<dir>`)
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Logical store directory
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Nix state directory holding the store database
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Print errors in `<tag>,<message>` form
    #[arg(long, global = true)]
    pub wire_errors: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the store version
    Version,

    /// Validate a store path and print it relative to the store directory
    Path {
        /// Absolute store path or `<hash>-<name>`
        path: String,
    },

    /// Print the name of a derivation
    DrvName { path: String },

    /// Print a value from a derivation's environment
    Env { path: String, key: String },

    /// Print the metadata of a valid path as JSON
    Info { path: String },
}

impl Cli {
    /// Apply command line overrides to `settings`.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(store) = &self.store {
            settings.store.clone_from(store);
        }
        if let Some(dir) = &self.store_dir {
            settings.store_dir.clone_from(dir);
        }
        if let Some(dir) = &self.state_dir {
            settings.state_dir.clone_from(dir);
        }
        settings
    }
}
