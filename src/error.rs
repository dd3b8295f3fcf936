//! General error types
//!
//! This module contains error types that do not arise from consuming bytes
//! off the wire; those live in [`crate::parse::error`]. What remains here
//! covers malformed message descriptors and malformed hex-strings.

use std::error::Error;
use std::fmt::{Debug, Display};

/// Error type representing all possible conditions for invalidity
/// encountered when attempting to parse a string-type as a series
/// of hex-encoded bytes.
#[derive(Clone, PartialEq, Eq, Ord, PartialOrd)]
pub enum HexConvError {
    /// Error case for odd-length strings
    OddParity(String),
    /// Error case for strings containing non-hex characters,
    /// i.e. anything not in `[0-9a-fA-F]`.
    NonHex(String),
}

impl Debug for HexConvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OddParity(invalid) => {
                write!(f, "non-even length-parity for string `{}`", invalid)
            }
            Self::NonHex(invalid) => write!(f, "non-hex character found in string `{}`", invalid),
        }
    }
}

impl Display for HexConvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OddParity(_) => {
                write!(f, "hex-conversion failed on odd-length string")
            }
            Self::NonHex(_) => {
                write!(f, "hex-conversion failed on non-hex character")
            }
        }
    }
}

impl Error for HexConvError {}

/// Error type for field tables that cannot describe a legal message.
///
/// The derive macro rejects all of these at compile time; this type is only
/// ever observed by code that builds a [`MessageDescriptor`] by hand via
/// [`MessageDescriptor::try_new`].
///
/// [`MessageDescriptor`]: crate::descriptor::MessageDescriptor
/// [`MessageDescriptor::try_new`]: crate::descriptor::MessageDescriptor::try_new
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DescriptorError {
    /// Field number was `0` or exceeded [`MAX_TAG_ID`](crate::wire::MAX_TAG_ID)
    TagOutOfRange {
        message: &'static str,
        field: &'static str,
        tag_id: u32,
    },
    /// Two fields of one message declared the same field number
    DuplicateTag {
        message: &'static str,
        first: &'static str,
        second: &'static str,
        tag_id: u32,
    },
    /// Field number fell within `19000..=19999`
    ReservedTag {
        message: &'static str,
        field: &'static str,
        tag_id: u32,
    },
}

impl Display for DescriptorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptorError::TagOutOfRange {
                message,
                field,
                tag_id,
            } => write!(
                f,
                "field `{message}.{field}` has field number {tag_id}, outside of 1..={}",
                crate::wire::MAX_TAG_ID
            ),
            DescriptorError::DuplicateTag {
                message,
                first,
                second,
                tag_id,
            } => write!(
                f,
                "fields `{message}.{first}` and `{message}.{second}` share field number {tag_id}"
            ),
            DescriptorError::ReservedTag {
                message,
                field,
                tag_id,
            } => write!(
                f,
                "field `{message}.{field}` uses reserved field number {tag_id}"
            ),
        }
    }
}

impl Error for DescriptorError {}
