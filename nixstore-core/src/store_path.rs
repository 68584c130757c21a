// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Store path types, parsing and validation.
//!
//! A store path is `<store-dir>/<hash>-<name>` where `<hash>` is the
//! nix-base32 encoding of a 160-bit digest. The part after the store
//! directory is the *base name*, which is also the canonical
//! store-relative form of the path.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::base32;

/// Length of the encoded hash part of a store path.
pub const HASH_PART_LEN: usize = base32::encode_len(DIGEST_SIZE);

/// Longest name Nix accepts after the hash part.
pub const MAX_NAME_LEN: usize = 211;

const DIGEST_SIZE: usize = 20;

/// Errors produced while parsing a store path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorePathError {
    #[error("path '{0}' is not in the Nix store")]
    NotInStore(String),

    #[error("'{0}' is too short to be a valid store path")]
    TooShort(String),

    #[error("store path '{path}' contains illegal base-32 character '{c}'")]
    InvalidHashChar { path: String, c: char },

    #[error("store path '{0}' is missing the '-' separator after the hash part")]
    MissingSeparator(String),

    #[error("store path '{0}' has an empty name")]
    EmptyName(String),

    #[error("store path '{0}' has a name longer than {max} characters", max = MAX_NAME_LEN)]
    NameTooLong(String),

    #[error("store path '{0}' starts with a period")]
    LeadingPeriod(String),

    #[error("store path '{path}' contains illegal character '{c}'")]
    InvalidNameChar { path: String, c: char },

    #[error("store directory '{0}' is not an absolute path")]
    InvalidStoreDir(String),
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '_' | '?' | '=')
}

/// A parsed store path, independent of the store directory it lives in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorePath {
    digest: [u8; DIGEST_SIZE],
    name: String,
}

impl StorePath {
    /// Parse the base name (`<hash>-<name>`) of a store path.
    pub fn from_base_name(base_name: &str) -> Result<Self, StorePathError> {
        if base_name.len() < HASH_PART_LEN + 1 {
            return Err(StorePathError::TooShort(base_name.to_owned()));
        }

        // The length check above does not guarantee the split lands on a
        // char boundary, so validate characters before slicing.
        if let Some(c) = base_name
            .chars()
            .take(HASH_PART_LEN)
            .find(|c| !base32::is_valid_char(*c))
        {
            return Err(StorePathError::InvalidHashChar {
                path: base_name.to_owned(),
                c,
            });
        }

        let (hash_part, rest) = base_name.split_at(HASH_PART_LEN);
        let Some(name) = rest.strip_prefix('-') else {
            return Err(StorePathError::MissingSeparator(base_name.to_owned()));
        };
        check_name(base_name, name)?;

        let mut digest = [0u8; DIGEST_SIZE];
        base32::decode_mut(hash_part.as_bytes(), &mut digest).map_err(|e| {
            let c = hash_part[e.position..].chars().next().unwrap_or('?');
            StorePathError::InvalidHashChar {
                path: base_name.to_owned(),
                c,
            }
        })?;

        Ok(Self {
            digest,
            name: name.to_owned(),
        })
    }

    /// The nix-base32 hash part.
    pub fn hash_part(&self) -> String {
        base32::encode_string(&self.digest)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn check_name(base_name: &str, name: &str) -> Result<(), StorePathError> {
    if name.is_empty() {
        return Err(StorePathError::EmptyName(base_name.to_owned()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(StorePathError::NameTooLong(base_name.to_owned()));
    }
    if name.starts_with('.') {
        return Err(StorePathError::LeadingPeriod(base_name.to_owned()));
    }
    if let Some(c) = name.chars().find(|c| !is_name_char(*c)) {
        return Err(StorePathError::InvalidNameChar {
            path: base_name.to_owned(),
            c,
        });
    }
    Ok(())
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.hash_part(), self.name)
    }
}

impl FromStr for StorePath {
    type Err = StorePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base_name(s)
    }
}

impl Serialize for StorePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The directory a store lives in, `/nix/store` by default.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreDir(String);

impl StoreDir {
    pub fn new(path: impl Into<String>) -> Result<Self, StorePathError> {
        let path = path.into();
        let canonical = canon_path(&path);
        if !path.starts_with('/') || canonical == "/" {
            return Err(StorePathError::InvalidStoreDir(path));
        }
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse an absolute path that must sit directly inside this store
    /// directory.
    pub fn parse_absolute(&self, path: &str) -> Result<StorePath, StorePathError> {
        let canonical = canon_path(path);
        match canonical.rsplit_once('/') {
            Some((dir, base_name)) if path.starts_with('/') && dir == self.0 => {
                StorePath::from_base_name(base_name)
            }
            _ => Err(StorePathError::NotInStore(canonical)),
        }
    }

    /// Parse either an absolute store path or a store-relative base name.
    pub fn parse_path(&self, path: &str) -> Result<StorePath, StorePathError> {
        if path.contains('/') {
            self.parse_absolute(path)
        } else {
            StorePath::from_base_name(path)
        }
    }

    /// Display `path` as an absolute path inside this store.
    pub fn display<'a>(&'a self, path: &'a StorePath) -> impl fmt::Display + 'a {
        DisplayStorePath { dir: self, path }
    }
}

impl Default for StoreDir {
    fn default() -> Self {
        Self("/nix/store".to_owned())
    }
}

impl fmt::Display for StoreDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct DisplayStorePath<'a> {
    dir: &'a StoreDir,
    path: &'a StorePath,
}

impl fmt::Display for DisplayStorePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.dir, self.path)
    }
}

/// Lexically canonicalise a path: collapse repeated separators, drop `.`
/// components and resolve `..` against the preceding component.
fn canon_path(path: &str) -> String {
    let mut components: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            other => components.push(other),
        }
    }
    format!("/{}", components.join("/"))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    const HELLO: &str = "26xbg1ndr7hbcncrlf9nhx5is2b25d13-hello-2.12.1";

    #[test]
    fn parse_base_name() {
        let path = StorePath::from_base_name(HELLO).unwrap();
        assert_eq!(path.hash_part(), "26xbg1ndr7hbcncrlf9nhx5is2b25d13");
        assert_eq!(path.name(), "hello-2.12.1");
        assert_eq!(path.to_string(), HELLO);
    }

    #[rstest]
    #[case::absolute("/nix/store/26xbg1ndr7hbcncrlf9nhx5is2b25d13-hello-2.12.1")]
    #[case::relative("26xbg1ndr7hbcncrlf9nhx5is2b25d13-hello-2.12.1")]
    #[case::double_slash("/nix//store/26xbg1ndr7hbcncrlf9nhx5is2b25d13-hello-2.12.1")]
    #[case::trailing_slash("/nix/store/26xbg1ndr7hbcncrlf9nhx5is2b25d13-hello-2.12.1/")]
    #[case::dot_component("/nix/./store/26xbg1ndr7hbcncrlf9nhx5is2b25d13-hello-2.12.1")]
    fn parse_accepted_forms(#[case] input: &str) {
        let store_dir = StoreDir::default();
        let path = store_dir.parse_path(input).unwrap();
        assert_eq!(path.to_string(), HELLO);
        assert_eq!(
            store_dir.display(&path).to_string(),
            format!("/nix/store/{HELLO}")
        );
    }

    #[rstest]
    #[case::empty("", "is too short")]
    #[case::not_a_path("not a path", "is too short")]
    #[case::outside_store("/not-nix/not-store/meow", "is not in the Nix store")]
    #[case::nested("/nix/store/26xbg1ndr7hbcncrlf9nhx5is2b25d13-hello/bin", "is not in the Nix store")]
    #[case::relative_with_dir("store/26xbg1ndr7hbcncrlf9nhx5is2b25d13-hello", "is not in the Nix store")]
    #[case::store_dir_itself("/nix/store", "is not in the Nix store")]
    #[case::bad_hash(
        "/nix/store/2qwfcp-----------------d0xxc253d-dwm-status-1.10.0.drv",
        "contains illegal base-32 character '-'"
    )]
    #[case::forbidden_letter("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee-hello", "illegal base-32 character 'e'")]
    #[case::no_separator("26xbg1ndr7hbcncrlf9nhx5is2b25d13_hello", "missing the '-' separator")]
    #[case::empty_name("26xbg1ndr7hbcncrlf9nhx5is2b25d13-", "has an empty name")]
    #[case::leading_period("26xbg1ndr7hbcncrlf9nhx5is2b25d13-.hidden", "starts with a period")]
    #[case::space_in_name("26xbg1ndr7hbcncrlf9nhx5is2b25d13-hello world", "illegal character ' '")]
    #[case::multibyte_hash("ééééééééééééééééééééééééééééééé-x", "illegal base-32 character 'é'")]
    fn parse_rejected(#[case] input: &str, #[case] needle: &str) {
        let err = StoreDir::default().parse_path(input).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(needle), "{msg:?} does not contain {needle:?}");
    }

    #[test]
    fn name_length_limit() {
        let hash = "26xbg1ndr7hbcncrlf9nhx5is2b25d13";
        let longest = format!("{hash}-{}", "a".repeat(MAX_NAME_LEN));
        assert!(StorePath::from_base_name(&longest).is_ok());

        let too_long = format!("{hash}-{}", "a".repeat(MAX_NAME_LEN + 1));
        assert!(matches!(
            StorePath::from_base_name(&too_long),
            Err(StorePathError::NameTooLong(_))
        ));
    }

    #[test]
    fn custom_store_dir() {
        let store_dir = StoreDir::new("/tmp/store/").unwrap();
        assert_eq!(store_dir.as_str(), "/tmp/store");
        assert!(
            store_dir
                .parse_path(&format!("/tmp/store/{HELLO}"))
                .is_ok()
        );
        assert!(matches!(
            store_dir.parse_path(&format!("/nix/store/{HELLO}")),
            Err(StorePathError::NotInStore(_))
        ));
    }

    #[rstest]
    #[case::relative("nix/store")]
    #[case::root("/")]
    fn invalid_store_dir(#[case] dir: &str) {
        assert!(matches!(
            StoreDir::new(dir),
            Err(StorePathError::InvalidStoreDir(_))
        ));
    }

    #[test]
    fn serializes_as_base_name() {
        let path = StorePath::from_base_name(HELLO).unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), format!("\"{HELLO}\""));
    }

    proptest! {
        #[test]
        fn proptest_canonical_form(
            hash in "[0-9a-df-np-sv-z]{32}",
            name in "[a-zA-Z0-9+_?=][a-zA-Z0-9+_?=.-]{0,60}",
        ) {
            let base_name = format!("{hash}-{name}");
            let store_dir = StoreDir::default();
            let relative = store_dir.parse_path(&base_name).unwrap();
            let absolute = store_dir.parse_path(&format!("/nix/store/{base_name}")).unwrap();
            prop_assert_eq!(relative.to_string(), base_name);
            prop_assert_eq!(relative, absolute);
        }
    }
}
