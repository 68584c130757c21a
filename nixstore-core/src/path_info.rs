// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Metadata a store keeps about a valid path.

use std::collections::BTreeSet;
use std::time::SystemTime;

use serde::Serialize;

use crate::store_path::StorePath;

/// Snapshot of the metadata record for a valid store path.
///
/// Values of this type are plain data: once built they are never updated
/// from the store again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathInfo {
    /// The path this record describes
    pub path: StorePath,
    /// Hash of the NAR serialisation, as recorded by the store
    pub nar_hash: String,
    /// Size of the NAR serialisation
    pub nar_size: Option<u64>,
    /// Derivation that produced this path (if known)
    pub deriver: Option<StorePath>,
    /// Runtime dependencies
    pub references: BTreeSet<StorePath>,
    /// Cryptographic signatures
    pub signatures: Vec<String>,
    /// Content address assertion (if content-addressed)
    pub ca: Option<String>,
    /// When the path was registered
    pub registration_time: SystemTime,
    /// Whether the path was built locally rather than substituted
    pub ultimate: bool,
}
