// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Rows read from the store database.

use std::collections::BTreeSet;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A `ValidPaths` row together with the paths it references.
///
/// Store paths are kept as the absolute strings Nix wrote; interpreting them
/// is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRow {
    pub id: i64,
    /// Absolute store path
    pub path: String,
    /// NAR hash in `<algo>:<digest>` form
    pub hash: String,
    pub registration_time: SystemTime,
    pub deriver: Option<String>,
    pub nar_size: Option<u64>,
    pub ultimate: bool,
    /// Signatures separated by whitespace, as stored
    pub sigs: Option<String>,
    pub ca: Option<String>,
    /// Absolute paths from the `Refs` table
    pub references: BTreeSet<String>,
}

impl PathRow {
    pub fn signatures(&self) -> impl Iterator<Item = &str> {
        self.sigs.iter().flat_map(|s| s.split_whitespace())
    }
}

/// Nix stores registration times as seconds since the epoch.
pub(crate) fn from_unix_secs(secs: i64) -> SystemTime {
    let offset = Duration::from_secs(secs.unsigned_abs());
    if secs < 0 {
        UNIX_EPOCH.checked_sub(offset).unwrap_or(UNIX_EPOCH)
    } else {
        UNIX_EPOCH.checked_add(offset).unwrap_or(UNIX_EPOCH)
    }
}

#[cfg(any(test, feature = "test"))]
pub(crate) fn to_unix_secs(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |s| -s),
    }
}
