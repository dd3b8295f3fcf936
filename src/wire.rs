//! Wire types, tags, and the classification of scalar categories
//!
//! Every field on the wire is introduced by a *tag*, the varint
//! `(tag_id << 3) | wire_type`. The wire type tells a reader how to find
//! the end of the payload that follows, which is all it needs to skip a field
//! it does not recognize; the field number tells it which declared field the
//! payload belongs to.
//!
//! # Tag width
//!
//! By default, tags are restricted to a single byte, which caps field numbers
//! at [`MAX_TAG_ID`]` = 15`. A tag byte with its continuation bit set is
//! rejected as a [`MultiByteTag`] violation rather than misread. Enabling the
//! `varint_tags` feature lifts this restriction, reading and writing tags as
//! full varints with field numbers up to `2^29 - 1`, as protobuf proper does.
//! For field numbers `<= 15` the two formats produce identical bytes.
//!
//! [`MultiByteTag`]: crate::parse::error::ProtocolViolation::MultiByteTag

use std::fmt::{Display, Formatter};

use crate::conv::target::Target;
use crate::parse::error::ProtocolViolation;
use crate::parse::{Cursor, ParseResult};

cfg_if::cfg_if! {
    if #[cfg(feature = "varint_tags")] {
        /// Largest field number that a tag can carry
        pub const MAX_TAG_ID: u32 = (1 << 29) - 1;
    } else {
        /// Largest field number that a tag can carry
        pub const MAX_TAG_ID: u32 = 15;
    }
}

/// Field numbers reserved for the implementation of protobuf itself
pub const RESERVED_TAG_IDS: std::ops::RangeInclusive<u32> = 19_000..=19_999;

/// Compile-time validation hook for field numbers declared by derived messages.
///
/// # Panics
///
/// Panics (as a const-evaluation error, when used in a `const` item) if `id`
/// is `0` or exceeds [`MAX_TAG_ID`].
#[must_use]
pub const fn check_tag_id(id: u32) -> u32 {
    assert!(
        id >= 1 && id <= MAX_TAG_ID,
        "field number outside of the range supported by the current tag format"
    );
    id
}

/// The four encodings a field payload may take on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    Delimited = 2,
    Fixed32 = 5,
}

impl WireType {
    /// Value of the low three bits of a tag introducing a payload of this type
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Inverse of [`WireType::bits`], returning `None` for the deprecated
    /// group markers (`3`, `4`) and the unassigned values `6` and `7`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::Delimited),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            WireType::Varint => "VARINT",
            WireType::Fixed64 => "FIXED64",
            WireType::Delimited => "DELIMITED",
            WireType::Fixed32 => "FIXED32",
        }
    }
}

impl Display for WireType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Field number paired with the wire type of the payload that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    id: u32,
    wire_type: WireType,
}

impl Tag {
    #[inline]
    #[must_use]
    pub const fn new(id: u32, wire_type: WireType) -> Self {
        Self { id, wire_type }
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    #[must_use]
    pub const fn wire_type(&self) -> WireType {
        self.wire_type
    }

    /// Numeric value of the tag as it appears on the wire, before varint encoding
    #[inline]
    #[must_use]
    pub const fn key(&self) -> u64 {
        ((self.id as u64) << 3) | self.wire_type.bits() as u64
    }

    /// Appends the tag to `buf`, returning the number of bytes written.
    ///
    /// Field numbers at or below 15 always occupy exactly one byte.
    #[inline]
    pub fn write_to<U: Target>(&self, buf: &mut U) -> usize {
        crate::prim::write_varint(self.key(), buf)
    }

    /// Interprets an already-read tag value, with `offset` marking the first
    /// byte of the tag for error reporting.
    pub fn from_key(key: u64, offset: usize) -> ParseResult<Self> {
        let bits = (key & 0x7) as u8;
        let wire_type = WireType::from_bits(bits)
            .ok_or(ProtocolViolation::UnsupportedWireType { offset, bits })?;
        let tag_id = key >> 3;
        if tag_id == 0 || tag_id > MAX_TAG_ID as u64 {
            return Err(ProtocolViolation::InvalidTagId { offset, tag_id }.into());
        }
        Ok(Self {
            id: tag_id as u32,
            wire_type,
        })
    }

    /// Consumes one tag from the front of `cur`.
    ///
    /// # Errors
    ///
    /// Fails with [`TruncatedInput`](crate::parse::error::TruncatedInput) if
    /// `cur` is empty or ends partway through the tag, and with a
    /// [`ProtocolViolation`] if the wire type or field number is invalid.
    pub fn read(cur: Cursor<'_>) -> ParseResult<(Self, Cursor<'_>)> {
        let offset = cur.offset();
        cfg_if::cfg_if! {
            if #[cfg(feature = "varint_tags")] {
                let (key, rest) = crate::prim::read_varint(cur)?;
                Ok((Self::from_key(key, offset)?, rest))
            } else {
                let (byte, rest) = cur.take_byte()?;
                if byte & 0x80 != 0 {
                    return Err(ProtocolViolation::MultiByteTag { offset, byte }.into());
                }
                Ok((Self::from_key(byte as u64, offset)?, rest))
            }
        }
    }
}

/// Declared category of a scalar field, fixing both its wire type and the
/// transformation applied to its value before it reaches the primitive codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Float,
    Double,
    String,
    Bytes,
}

impl ScalarKind {
    /// Classifies a scalar category into the wire type used to carry it.
    #[must_use]
    pub const fn wire_type(self) -> WireType {
        match self {
            ScalarKind::Bool
            | ScalarKind::Int32
            | ScalarKind::Int64
            | ScalarKind::UInt32
            | ScalarKind::UInt64
            | ScalarKind::SInt32
            | ScalarKind::SInt64 => WireType::Varint,
            ScalarKind::Fixed32 | ScalarKind::SFixed32 | ScalarKind::Float => WireType::Fixed32,
            ScalarKind::Fixed64 | ScalarKind::SFixed64 | ScalarKind::Double => WireType::Fixed64,
            ScalarKind::String | ScalarKind::Bytes => WireType::Delimited,
        }
    }

    /// Name of the category in `.proto` schema syntax
    #[must_use]
    pub const fn proto_name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::UInt32 => "uint32",
            ScalarKind::UInt64 => "uint64",
            ScalarKind::SInt32 => "sint32",
            ScalarKind::SInt64 => "sint64",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::SFixed32 => "sfixed32",
            ScalarKind::SFixed64 => "sfixed64",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
        }
    }

    /// Returns `true` for the categories whose varint payload is zigzag-mapped
    #[must_use]
    pub const fn is_zigzag(self) -> bool {
        matches!(self, ScalarKind::SInt32 | ScalarKind::SInt64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        use ScalarKind::*;
        for kind in [Bool, Int32, Int64, UInt32, UInt64, SInt32, SInt64] {
            assert_eq!(kind.wire_type(), WireType::Varint, "{kind:?}");
        }
        for kind in [Fixed32, SFixed32, Float] {
            assert_eq!(kind.wire_type(), WireType::Fixed32, "{kind:?}");
        }
        for kind in [Fixed64, SFixed64, Double] {
            assert_eq!(kind.wire_type(), WireType::Fixed64, "{kind:?}");
        }
        for kind in [String, Bytes] {
            assert_eq!(kind.wire_type(), WireType::Delimited, "{kind:?}");
        }
        assert!(SInt64.is_zigzag());
        assert!(!Int64.is_zigzag());
    }

    #[test]
    fn tag_bytes() {
        let mut buf = Vec::new();
        Tag::new(1, WireType::Delimited).write_to(&mut buf);
        Tag::new(2, WireType::Varint).write_to(&mut buf);
        Tag::new(15, WireType::Fixed32).write_to(&mut buf);
        assert_eq!(buf, [0x0a, 0x10, 0x7d]);

        let (tag, rest) = Tag::read(Cursor::new(&buf)).unwrap();
        assert_eq!(tag, Tag::new(1, WireType::Delimited));
        assert_eq!(rest.offset(), 1);
    }

    #[test]
    fn tag_rejects() {
        // wire type 3 (start group)
        assert!(matches!(
            Tag::read(Cursor::new(&[0x0b])),
            Err(crate::parse::ParseError::Violation(
                ProtocolViolation::UnsupportedWireType { bits: 3, .. }
            ))
        ));
        // field number 0
        assert!(matches!(
            Tag::read(Cursor::new(&[0x02])),
            Err(crate::parse::ParseError::Violation(
                ProtocolViolation::InvalidTagId { tag_id: 0, .. }
            ))
        ));
        assert!(Tag::read(Cursor::new(&[])).unwrap_err().is_truncated());
    }

    #[cfg(not(feature = "varint_tags"))]
    #[test]
    fn single_byte_tags() {
        assert_eq!(MAX_TAG_ID, 15);
        // field 16, varint: 0x80 0x01
        assert!(matches!(
            Tag::read(Cursor::new(&[0x80, 0x01])),
            Err(crate::parse::ParseError::Violation(
                ProtocolViolation::MultiByteTag { offset: 0, byte: 0x80 }
            ))
        ));
    }

    #[cfg(feature = "varint_tags")]
    #[test]
    fn varint_tags() {
        let mut buf = Vec::new();
        Tag::new(16, WireType::Varint).write_to(&mut buf);
        assert_eq!(buf, [0x80, 0x01]);
        let (tag, rest) = Tag::read(Cursor::new(&buf)).unwrap();
        assert_eq!(tag.id(), 16);
        assert!(rest.is_empty());
    }
}
