// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Tagged errors and their wire form.
//!
//! Failures cross from the engine to the caller as a single flat string,
//! `"<tag>,<message>"`, where `<tag>` is the integer value of an
//! [`ErrorTag`]. [`Error`] is what callers match on.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;
use tracing::warn;

pub type Result<T> = std::result::Result<T, Error>;

/// Kind of a failure, as carried in the wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum ErrorTag {
    GetVersion = 0,
    StorePath = 1,
    EnvKeyDoesNotExist = 2,
}

/// A failure with its kind attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedError {
    pub tag: ErrorTag,
    pub message: String,
}

/// Build a [`TaggedError`] from a tag and a format string.
#[macro_export]
macro_rules! tagged {
    ($tag:expr, $($arg:tt)+) => {
        $crate::error::TaggedError::new($tag, format!($($arg)+))
    };
}

impl TaggedError {
    pub fn new(tag: ErrorTag, message: impl Into<String>) -> Self {
        Self {
            tag,
            message: message.into(),
        }
    }

    /// Tag a lower-level failure, keeping only its message.
    pub fn wrap(tag: ErrorTag, err: &impl fmt::Display) -> Self {
        Self::new(tag, err.to_string())
    }

    pub fn encode(&self) -> String {
        format!("{},{}", u8::from(self.tag), self.message)
    }

    /// Decode a wire string.
    ///
    /// Splits on the first comma only, so the message may contain commas.
    pub fn decode(what: &str) -> std::result::Result<Self, DecodeError> {
        let (tag, message) = what.split_once(',').ok_or(DecodeError::MissingSeparator)?;
        let repr: u8 = tag
            .parse()
            .map_err(|_| DecodeError::BadTag(tag.to_string()))?;
        let tag = ErrorTag::try_from(repr).map_err(|_| DecodeError::UnknownTag {
            tag: repr,
            message: message.to_string(),
        })?;
        Ok(Self::new(tag, message))
    }
}

impl fmt::Display for TaggedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no ',' after the tag")]
    MissingSeparator,
    #[error("tag '{0}' is not an integer")]
    BadTag(String),
    #[error("unknown tag {tag}")]
    UnknownTag { tag: u8, message: String },
}

/// A failure in wire form, as raised by the engine-facing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireError {
    what: String,
    encoded: bool,
}

impl WireError {
    /// A failure that carries no tag. Its message is never decoded.
    pub fn untagged(err: &impl fmt::Display) -> Self {
        Self {
            what: err.to_string(),
            encoded: false,
        }
    }

    /// A string in `"<tag>,<message>"` form, decoded on conversion to
    /// [`Error`].
    pub fn encoded(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            encoded: true,
        }
    }

    pub fn what(&self) -> &str {
        &self.what
    }
}

impl From<TaggedError> for WireError {
    fn from(err: TaggedError) -> Self {
        Self::encoded(err.encode())
    }
}

/// Errors returned by [`Store`](crate::Store) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    GenericNixError(String),
    #[error("failed to get nix version from store: {0}")]
    GetVersion(String),
    #[error("store path not valid: {0}")]
    StorePath(String),
    #[error("while reading derivation: {0}")]
    EnvKeyDoesNotExist(String),
}

impl Error {
    /// The tag this error was raised with, if any.
    pub fn tag(&self) -> Option<ErrorTag> {
        match self {
            Error::GenericNixError(_) => None,
            Error::GetVersion(_) => Some(ErrorTag::GetVersion),
            Error::StorePath(_) => Some(ErrorTag::StorePath),
            Error::EnvKeyDoesNotExist(_) => Some(ErrorTag::EnvKeyDoesNotExist),
        }
    }

    /// The message without the kind-specific prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::GenericNixError(msg)
            | Error::GetVersion(msg)
            | Error::StorePath(msg)
            | Error::EnvKeyDoesNotExist(msg) => msg,
        }
    }

    /// The wire form of this error.
    pub fn to_wire(&self) -> String {
        match self.tag() {
            Some(tag) => TaggedError::new(tag, self.message()).encode(),
            None => self.message().to_string(),
        }
    }
}

impl From<TaggedError> for Error {
    fn from(TaggedError { tag, message }: TaggedError) -> Self {
        match tag {
            ErrorTag::GetVersion => Error::GetVersion(message),
            ErrorTag::StorePath => Error::StorePath(message),
            ErrorTag::EnvKeyDoesNotExist => Error::EnvKeyDoesNotExist(message),
        }
    }
}

impl From<WireError> for Error {
    fn from(value: WireError) -> Self {
        if !value.encoded {
            return Error::GenericNixError(value.what);
        }
        match TaggedError::decode(value.what()) {
            Ok(tagged) => tagged.into(),
            Err(DecodeError::UnknownTag { tag, message }) => {
                warn!("engine returned an error with an unknown tag \"{tag}\"");
                Error::GenericNixError(message)
            }
            Err(_) => Error::GenericNixError(value.what),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::get_version(ErrorTag::GetVersion, 0)]
    #[case::store_path(ErrorTag::StorePath, 1)]
    #[case::env_key(ErrorTag::EnvKeyDoesNotExist, 2)]
    fn tag_values(#[case] tag: ErrorTag, #[case] value: u8) {
        assert_eq!(u8::from(tag), value);
        assert_eq!(ErrorTag::try_from(value).unwrap(), tag);
    }

    #[test]
    fn tagged_macro() {
        let err = tagged!(ErrorTag::StorePath, "path '{}' is not valid", "/nix/store/x");
        assert_eq!(err.encode(), "1,path '/nix/store/x' is not valid");
    }

    #[test]
    fn message_with_commas() {
        let decoded = TaggedError::decode("2,key 'a,b', sadly, is missing").unwrap();
        assert_eq!(decoded.tag, ErrorTag::EnvKeyDoesNotExist);
        assert_eq!(decoded.message, "key 'a,b', sadly, is missing");
    }

    #[rstest]
    #[case::missing_separator("just a message", DecodeError::MissingSeparator)]
    #[case::bad_tag("x,message", DecodeError::BadTag("x".to_string()))]
    #[case::empty_tag(",message", DecodeError::BadTag(String::new()))]
    #[case::unknown_tag("7,message", DecodeError::UnknownTag { tag: 7, message: "message".to_string() })]
    fn decode_errors(#[case] what: &str, #[case] expected: DecodeError) {
        assert_eq!(TaggedError::decode(what).unwrap_err(), expected);
    }

    #[rstest]
    #[case::tagged("0,no version", Error::GetVersion("no version".to_string()))]
    #[case::untagged("database is locked", Error::GenericNixError("database is locked".to_string()))]
    #[case::unknown_tag("9,strange", Error::GenericNixError("strange".to_string()))]
    #[case::overflowing_tag("300,strange", Error::GenericNixError("300,strange".to_string()))]
    fn from_wire(#[case] what: &str, #[case] expected: Error) {
        assert_eq!(Error::from(WireError::encoded(what)), expected);
    }

    #[rstest]
    #[case::looks_tagged("1,database disk image is malformed")]
    #[case::plain("database is locked")]
    fn untagged_is_never_decoded(#[case] what: &str) {
        let err = Error::from(WireError::untagged(&what));
        assert_eq!(err, Error::GenericNixError(what.to_string()));
        assert_eq!(err.to_wire(), what);
    }

    #[test]
    fn display_prefixes() {
        let err = Error::EnvKeyDoesNotExist("key 'PATH' is missing".to_string());
        assert_eq!(err.to_string(), "while reading derivation: key 'PATH' is missing");
        assert_eq!(err.to_wire(), "2,key 'PATH' is missing");

        let err = Error::GenericNixError("boom".to_string());
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.tag(), None);
        assert_eq!(err.to_wire(), "boom");
    }

    fn any_tag() -> impl Strategy<Value = ErrorTag> {
        prop_oneof![
            Just(ErrorTag::GetVersion),
            Just(ErrorTag::StorePath),
            Just(ErrorTag::EnvKeyDoesNotExist),
        ]
    }

    proptest! {
        #[test]
        fn wire_roundtrip(tag in any_tag(), message in ".*") {
            let err = TaggedError::new(tag, message.clone());
            let decoded = Error::from(WireError::from(err));
            prop_assert_eq!(decoded.tag(), Some(tag));
            prop_assert_eq!(decoded.message(), message.as_str());
        }
    }
}
