// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Core Nix store types.
//!
//! This crate is IO-free: it only knows how store paths, path metadata and
//! derivations look, not where they are stored.
//!
//! # Key Modules
//!
//! - `store_path` - Store path grammar and the store directory
//! - `path_info` - Metadata snapshot of a valid path
//! - `derivation` - Derivation records
//! - `aterm` - Parser for the `.drv` file format

pub mod aterm;
pub mod base32;
pub mod derivation;
pub mod path_info;
pub mod store_path;

pub use aterm::ATermError;
pub use derivation::{Derivation, DerivationOutput};
pub use path_info::PathInfo;
pub use store_path::{StoreDir, StorePath, StorePathError};
