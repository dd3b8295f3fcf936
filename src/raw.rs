//! Descriptor-free view of encoded messages
//!
//! [`RawFields`] walks the tagged units of any buffer without knowing which
//! message type produced it, yielding each tag together with its undecoded
//! payload. It backs the `protean-dump` binary, and is handy for inspecting
//! blobs whose type is unknown or has drifted.

use std::fmt::{self, Display};

use crate::hexstring::hex_of_bytes;
use crate::parse::{Cursor, ParseResult};
use crate::prim::{read_delimited, read_fixed32, read_fixed64, read_varint};
use crate::wire::{Tag, WireType};

/// Payload of one tagged unit, interpreted only as far as its wire type
/// allows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawValue<'a> {
    Varint(u64),
    Fixed32(u32),
    Fixed64(u64),
    Delimited(&'a [u8]),
}

impl RawValue<'_> {
    #[must_use]
    pub const fn wire_type(&self) -> WireType {
        match self {
            RawValue::Varint(_) => WireType::Varint,
            RawValue::Fixed32(_) => WireType::Fixed32,
            RawValue::Fixed64(_) => WireType::Fixed64,
            RawValue::Delimited(_) => WireType::Delimited,
        }
    }
}

impl Display for RawValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Varint(v) => write!(f, "{v}"),
            RawValue::Fixed32(v) => write!(f, "0x{v:08x}"),
            RawValue::Fixed64(v) => write!(f, "0x{v:016x}"),
            RawValue::Delimited(bytes) => write!(f, "[{}]{{{}}}", bytes.len(), hex_of_bytes(bytes)),
        }
    }
}

/// One tagged unit, located at `offset` within the buffer being walked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawField<'a> {
    pub tag: Tag,
    pub offset: usize,
    pub value: RawValue<'a>,
}

impl Display for RawField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@{}: #{} {} = {}",
            self.offset,
            self.tag.id(),
            self.tag.wire_type(),
            self.value
        )
    }
}

/// Iterator over the tagged units of a buffer
///
/// Yields `Err` at most once, after which iteration stops.
#[derive(Clone, Debug)]
pub struct RawFields<'a> {
    cur: Cursor<'a>,
    failed: bool,
}

impl<'a> RawFields<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::from_cursor(Cursor::new(bytes))
    }

    #[must_use]
    pub const fn from_cursor(cur: Cursor<'a>) -> Self {
        Self { cur, failed: false }
    }

    fn read_one(&self) -> ParseResult<(RawField<'a>, Cursor<'a>)> {
        let offset = self.cur.offset();
        let (tag, cur) = Tag::read(self.cur)?;
        let (value, rest) = match tag.wire_type() {
            WireType::Varint => {
                let (v, rest) = read_varint(cur)?;
                (RawValue::Varint(v), rest)
            }
            WireType::Fixed32 => {
                let (v, rest) = read_fixed32(cur)?;
                (RawValue::Fixed32(v), rest)
            }
            WireType::Fixed64 => {
                let (v, rest) = read_fixed64(cur)?;
                (RawValue::Fixed64(v), rest)
            }
            WireType::Delimited => {
                let (bytes, rest) = read_delimited(cur)?;
                (RawValue::Delimited(bytes), rest)
            }
        };
        Ok((RawField { tag, offset, value }, rest))
    }
}

impl<'a> Iterator for RawFields<'a> {
    type Item = ParseResult<RawField<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cur.is_empty() {
            return None;
        }
        match self.read_one() {
            Ok((field, rest)) => {
                self.cur = rest;
                Some(Ok(field))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for RawFields<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex;
    use crate::parse::error::{ParseError, TruncatedInput};

    #[test]
    fn walks_units() {
        let bytes = hex!("0a05776f726c64 109601 2d01000000 31ffffffffffffffff");
        let fields: Vec<_> = RawFields::new(&bytes)
            .collect::<ParseResult<_>>()
            .unwrap();
        assert_eq!(
            fields,
            vec![
                RawField {
                    tag: Tag::new(1, WireType::Delimited),
                    offset: 0,
                    value: RawValue::Delimited(b"world"),
                },
                RawField {
                    tag: Tag::new(2, WireType::Varint),
                    offset: 7,
                    value: RawValue::Varint(150),
                },
                RawField {
                    tag: Tag::new(5, WireType::Fixed32),
                    offset: 10,
                    value: RawValue::Fixed32(1),
                },
                RawField {
                    tag: Tag::new(6, WireType::Fixed64),
                    offset: 15,
                    value: RawValue::Fixed64(u64::MAX),
                },
            ]
        );
        assert_eq!(fields[1].to_string(), "@7: #2 VARINT = 150");
        assert_eq!(fields[0].value.to_string(), "[5]{776f726c64}");
    }

    #[test]
    fn stops_after_error() {
        let bytes = hex!("1001 0a05776f");
        let mut iter = RawFields::new(&bytes);
        assert!(matches!(iter.next(), Some(Ok(_))));
        assert_eq!(
            iter.next(),
            Some(Err(ParseError::Truncated(TruncatedInput {
                offset: 4,
                requested: 5,
                available: 2,
            })))
        );
        assert_eq!(iter.next(), None);
        assert_eq!(RawFields::new(&[]).count(), 0);
    }
}
