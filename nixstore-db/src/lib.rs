// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! SQLite interface to the Nix store metadata database.
//!
//! The database (`<state-dir>/db/db.sqlite`) is the store's index of valid
//! paths. This crate only reads it; the `test` feature adds just enough
//! write support to build fixture databases.
//!
//! # Example
//!
//! ```ignore
//! use nixstore_db::StoreDb;
//!
//! let db = StoreDb::open_read_only("/nix/var/nix/db/db.sqlite")?;
//! if let Some(row) = db.query_path_info("/nix/store/...")? {
//!     println!("NAR size: {}", row.nar_size.unwrap_or(0));
//! }
//! ```

mod connection;
mod error;
mod query;
#[cfg(any(test, feature = "test"))]
mod schema;
mod types;
#[cfg(any(test, feature = "test"))]
mod write;

pub use connection::StoreDb;
pub use error::{Error, Result};
pub use types::PathRow;
#[cfg(any(test, feature = "test"))]
pub use write::NewPath;
