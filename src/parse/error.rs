//! Error types used to report failure in low-level parsing
//!
//! This module contains a hierarchy of types representing specific
//! classes of error that may arise while consuming a [`Cursor`] over
//! untrusted bytes, whether in the primitive codecs of [`crate::prim`]
//! or in the message decoder of [`crate::decode`].
//!
//! # Layout
//!
//! This module defines the primary type `ParseError` and the alias
//! `ParseResult<T>`; it additionally defines the refinements of
//! `ParseError`, grouped according to similar provenance or nature:
//!
//!   * [`TruncatedInput`]: the buffer ended before a value was complete.
//!   * [`ProtocolViolation`]: the bytes are present but are not a legal
//!     encoding of the value being decoded.
//!   * [`InternalError`]: a generated or hand-written `Message`
//!     implementation disagreed with its own descriptor.
//!
//! [`Cursor`]: crate::parse::Cursor

use std::error::Error;
use std::fmt::{Display, Formatter, Result};
use std::str::Utf8Error;

use crate::wire::WireType;

/// Enumeration type over all errors that may be encountered when consuming
/// bytes through a [`Cursor`](crate::parse::Cursor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Error class encountered when a read would extend past the final byte
    /// of the current view.
    Truncated(TruncatedInput),
    /// Error class encountered when the bytes that are present cannot be
    /// interpreted as a legal encoding in the current context.
    Violation(ProtocolViolation),
    /// Error class encountered when internal invariants are violated
    Internal(InternalError),
}

impl ParseError {
    /// Returns `true` if this error was caused by running out of input.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, ParseError::Truncated(_))
    }

    /// Returns `true` if this error was caused by malformed (but present) input.
    #[must_use]
    pub const fn is_violation(&self) -> bool {
        matches!(self, ParseError::Violation(_))
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ParseError::Truncated(err) => Display::fmt(err, f),
            ParseError::Violation(err) => Display::fmt(err, f),
            ParseError::Internal(err) => Display::fmt(err, f),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseError::Truncated(err) => Some(err),
            ParseError::Violation(err) => Some(err),
            ParseError::Internal(err) => Some(err),
        }
    }
}

/// Type alias for Result with an error type of [`ParseError`]
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// A read requested more bytes than remain in the current view.
///
/// This covers varints whose continuation bit is still set on the last
/// available byte, fixed-width values cut short, and length prefixes that
/// declare more bytes than the enclosing view holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncatedInput {
    /// Absolute offset at which the failed read started
    pub offset: usize,
    /// Number of bytes the read required
    pub requested: u64,
    /// Number of bytes that were actually available
    pub available: usize,
}

impl From<TruncatedInput> for ParseError {
    fn from(err: TruncatedInput) -> Self {
        Self::Truncated(err)
    }
}

impl Display for TruncatedInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.available == 0 {
            write!(
                f,
                "truncated input at byte {}: needed {} bytes but the buffer has been fully consumed",
                self.offset, self.requested
            )
        } else {
            write!(
                f,
                "truncated input at byte {}: needed {} bytes but only {} remain",
                self.offset, self.requested, self.available
            )
        }
    }
}

impl Error for TruncatedInput {}

/// Bytes were available but do not form a legal encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// Low three bits of a tag named a wire type outside `{0, 1, 2, 5}`
    UnsupportedWireType { offset: usize, bits: u8 },
    /// Tag carried field number `0`, or one beyond [`MAX_TAG_ID`](crate::wire::MAX_TAG_ID)
    InvalidTagId { offset: usize, tag_id: u64 },
    /// Tag byte had its continuation bit set, which the single-byte tag format cannot represent
    MultiByteTag { offset: usize, byte: u8 },
    /// Varint ran past ten bytes, or its tenth byte carried bits beyond 64
    VarintOverflow { offset: usize },
    /// Wire type of a known field disagreed with the field's declared category
    WireTypeMismatch {
        message: &'static str,
        field: &'static str,
        expected: WireType,
        actual: WireType,
    },
    /// String field contained bytes that are not UTF-8
    InvalidUtf8 { offset: usize, error: Utf8Error },
    /// Enumeration field carried a value with no declared variant
    UnknownEnumValue { enumeration: &'static str, value: i32 },
    /// Field number not declared by the message, rejected by configuration
    UnknownField { message: &'static str, tag_id: u32 },
    /// Nested messages went deeper than the configured limit
    RecursionLimit { limit: usize },
}

impl From<ProtocolViolation> for ParseError {
    fn from(err: ProtocolViolation) -> Self {
        Self::Violation(err)
    }
}

impl Display for ProtocolViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::UnsupportedWireType { offset, bits } => {
                write!(f, "unsupported wire type {bits} in tag at byte {offset}")
            }
            Self::InvalidTagId { offset, tag_id } => {
                write!(f, "invalid field number {tag_id} in tag at byte {offset}")
            }
            Self::MultiByteTag { offset, byte } => {
                write!(
                    f,
                    "tag byte 0x{byte:02x} at byte {offset} continues past one byte"
                )
            }
            Self::VarintOverflow { offset } => {
                write!(f, "varint starting at byte {offset} overflows 64 bits")
            }
            Self::WireTypeMismatch {
                message,
                field,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "field `{message}.{field}` expects wire type {expected}, found {actual}"
                )
            }
            Self::InvalidUtf8 { offset, error } => {
                write!(f, "string at byte {offset} is not valid UTF-8: {error}")
            }
            Self::UnknownEnumValue { enumeration, value } => {
                write!(f, "value {value} is not a variant of enum `{enumeration}`")
            }
            Self::UnknownField { message, tag_id } => {
                write!(f, "field number {tag_id} is not declared by `{message}`")
            }
            Self::RecursionLimit { limit } => {
                write!(f, "nested messages exceed the depth limit of {limit}")
            }
        }
    }
}

impl Error for ProtocolViolation {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidUtf8 { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Implementation-internal errors
///
/// This error class represents 'impossible' cases which signify a
/// `Message` implementation whose slot accessors do not agree with the
/// descriptor it returns. Derived implementations never produce these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalError {
    UnknownSlot { message: &'static str, slot: usize },
}

impl From<InternalError> for ParseError {
    fn from(err: InternalError) -> Self {
        Self::Internal(err)
    }
}

impl Display for InternalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            InternalError::UnknownSlot { message, slot } => {
                write!(f, "BUG: `{message}` has no accessor for descriptor slot {slot}")
            }
        }
    }
}

impl Error for InternalError {}

#[cfg(test)]
mod test {
    use super::*;

    fn dummy<T: Send + Sync>() {}

    #[test]
    fn parse_error_threadsafe() {
        dummy::<ParseError>()
    }

    #[test]
    fn display() {
        let err: ParseError = TruncatedInput {
            offset: 3,
            requested: 5,
            available: 2,
        }
        .into();
        assert!(err.is_truncated());
        assert_eq!(
            err.to_string(),
            "truncated input at byte 3: needed 5 bytes but only 2 remain"
        );

        let err: ParseError = ProtocolViolation::WireTypeMismatch {
            message: "Person",
            field: "name",
            expected: WireType::Delimited,
            actual: WireType::Varint,
        }
        .into();
        assert!(err.is_violation());
        assert_eq!(
            err.to_string(),
            "field `Person.name` expects wire type DELIMITED, found VARINT"
        );
    }
}
