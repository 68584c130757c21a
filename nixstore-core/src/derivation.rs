// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Derivation records as stored in `.drv` files.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::store_path::StorePath;

/// One output of a derivation.
///
/// Fields are kept as they appear in the `.drv` file; empty strings in the
/// file are represented as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivationOutput {
    /// Output path for input-addressed and fixed-output derivations
    pub path: Option<StorePath>,
    /// Content-addressing method and algorithm, e.g. `r:sha256`
    pub hash_algo: Option<String>,
    /// Expected hash of fixed outputs, or `impure`
    pub hash: Option<String>,
}

/// A parsed derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Derivation {
    /// Declared name: the store path name without the `.drv` suffix
    pub name: String,
    pub outputs: BTreeMap<String, DerivationOutput>,
    /// Input derivations and the outputs used from each
    pub input_drvs: BTreeMap<StorePath, BTreeSet<String>>,
    pub input_srcs: BTreeSet<StorePath>,
    pub platform: String,
    pub builder: String,
    pub args: Vec<String>,
    /// Environment passed to the builder
    pub env: BTreeMap<String, String>,
}

impl Derivation {
    /// Look up an environment binding by exact key.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Name of the derivation stored at `drv_path`, or `None` if the path
    /// does not name a `.drv` file.
    pub fn name_from_path(drv_path: &StorePath) -> Option<&str> {
        drv_path
            .name()
            .strip_suffix(".drv")
            .filter(|name| !name.is_empty())
    }
}
