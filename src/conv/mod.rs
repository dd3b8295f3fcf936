//! Core of the binary-conversion API
//!
//! This module defines the three traits through which Rust types take part
//! in encoding and decoding:
//!
//!   * [`Value`]: a single value of some category (a scalar, an
//!     enumeration, or a nested message), knowing how to write and read its
//!     own payload and whether it equals its type's default.
//!   * [`Field`]: anything that may be declared as a message field. Every
//!     `Value` type is a singular field, and `Vec<T>` of any `Value` type is
//!     a repeated field.
//!   * [`Message`]: a record with a [`MessageDescriptor`], whose fields can
//!     be reached generically by slot.
//!
//! `Message` is normally derived, via [`Message`](macro@crate::Message),
//! which also emits the `Value` and `Field` implementations that let the
//! message be nested inside another.
//!
//! # Scalar mapping
//!
//! | Rust type | Category | Wire type |
//! |-----------|----------|-----------|
//! | `bool` | `bool` | VARINT |
//! | `i8`, `i16`, `i32` | `int32` | VARINT |
//! | `i64` | `int64` | VARINT |
//! | `u8`, `u16`, `u32` | `uint32` | VARINT |
//! | `u64` | `uint64` | VARINT |
//! | [`Signed<i8>`], [`Signed<i16>`], [`Signed<i32>`] | `sint32` | VARINT |
//! | [`Signed<i64>`] | `sint64` | VARINT |
//! | [`Fixed<bool>`], [`Fixed<u8>`], [`Fixed<u16>`], [`Fixed<u32>`] | `fixed32` | FIXED32 |
//! | [`Fixed<i8>`], [`Fixed<i16>`], [`Fixed<i32>`] | `sfixed32` | FIXED32 |
//! | [`Fixed<u64>`], [`Fixed<i64>`] | `fixed64`, `sfixed64` | FIXED64 |
//! | `f32` | `float` | FIXED32 |
//! | `f64` | `double` | FIXED64 |
//! | `String` | `string` | DELIMITED |
//! | [`Bytes`] | `bytes` | DELIMITED |
//!
//! Negative `int32` values are sign-extended to 64 bits before encoding, and
//! so always occupy ten bytes. Integers narrower than their category are
//! truncated on decode, as are `int32` and `uint32` values that arrive with
//! more than 32 significant bits. [`Signed`] is only implemented over signed
//! integers, since zigzag mapping has no use for unsigned values.
//!
//! [`MessageDescriptor`]: crate::descriptor::MessageDescriptor
//! [`Signed<i8>`]: crate::int::Signed
//! [`Signed<i16>`]: crate::int::Signed
//! [`Signed<i32>`]: crate::int::Signed
//! [`Signed<i64>`]: crate::int::Signed
//! [`Signed`]: crate::int::Signed
//! [`Fixed<bool>`]: crate::int::Fixed
//! [`Fixed<u8>`]: crate::int::Fixed
//! [`Fixed<u16>`]: crate::int::Fixed
//! [`Fixed<u32>`]: crate::int::Fixed
//! [`Fixed<i8>`]: crate::int::Fixed
//! [`Fixed<i16>`]: crate::int::Fixed
//! [`Fixed<i32>`]: crate::int::Fixed
//! [`Fixed<u64>`]: crate::int::Fixed
//! [`Fixed<i64>`]: crate::int::Fixed

pub mod target;

use std::ops::{Deref, DerefMut};

#[cfg(feature = "serde_impls")]
use serde::{Deserialize, Serialize};

use self::target::{ByteCounter, Target};
use crate::block::DataBlock;
use crate::decode::{DecodeConfig, DecodeContext, Diagnostics, LogDiagnostics};
use crate::descriptor::{FieldKind, MessageDescriptor, ValueKind};
use crate::int::{Fixed, Signed};
use crate::parse::error::ProtocolViolation;
use crate::parse::{Cursor, ParseResult};
use crate::prim::{
    read_delimited, read_fixed32, read_fixed64, read_varint, write_delimited, write_fixed32,
    write_fixed64, write_varint, zigzag_decode32, zigzag_decode64, zigzag_encode32,
    zigzag_encode64,
};
use crate::wire::{ScalarKind, Tag, WireType};

/// A single value of one field category
pub trait Value: Default {
    /// Category of the value, as recorded in field descriptors
    const KIND: ValueKind;

    /// Wire type carrying the value's payload
    const WIRE_TYPE: WireType = Self::KIND.wire_type();

    /// Returns `true` if `self` is the zero or empty value of its type, and
    /// therefore omitted when encoded as a field.
    fn is_default(&self) -> bool;

    /// Appends the payload of `self`, without any tag, returning the number
    /// of bytes written.
    fn write_value<U: Target>(&self, buf: &mut U) -> usize;

    /// Consumes one payload from the front of `cur`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`](crate::parse::ParseError) if the bytes at the
    /// front of `cur` are not a complete, legal payload for this category.
    fn read_value<'a>(
        cur: Cursor<'a>,
        ctx: &mut DecodeContext<'_>,
    ) -> ParseResult<(Self, Cursor<'a>)>;

    /// Consumes one payload and combines it into `self`.
    ///
    /// For scalars and enumerations, the newly read value replaces the old
    /// one. Nested messages override this to merge field-by-field.
    fn merge_value<'a>(
        &mut self,
        cur: Cursor<'a>,
        ctx: &mut DecodeContext<'_>,
    ) -> ParseResult<Cursor<'a>> {
        let (val, rest) = Self::read_value(cur, ctx)?;
        *self = val;
        Ok(rest)
    }

    /// Appends one tagged unit for `self` under field number `tag_id`, or
    /// nothing at all if `self` is a default value.
    fn write_unit<U: Target>(&self, tag_id: u32, buf: &mut U) -> usize {
        if self.is_default() {
            0
        } else {
            Tag::new(tag_id, Self::WIRE_TYPE).write_to(buf) + self.write_value(buf)
        }
    }
}

/// Anything that may be declared as a field of a [`Message`]
pub trait Field: Default {
    /// Category of the field, as recorded in its descriptor
    const KIND: FieldKind;

    /// Appends every tagged unit of the field, returning the number of bytes
    /// written.
    fn encode_field<U: Target>(&self, tag_id: u32, buf: &mut U) -> usize;

    /// Consumes the payload of one tagged unit, whose tag has already been
    /// read, and folds it into the field.
    fn merge_field<'a>(
        &mut self,
        cur: Cursor<'a>,
        ctx: &mut DecodeContext<'_>,
    ) -> ParseResult<Cursor<'a>>;
}

/// Record type with a descriptor-driven encoding
///
/// Implementors supply a [`MessageDescriptor`] and slot-wise access to their
/// fields; every other method is provided in terms of those three.
pub trait Message: Default {
    /// Field table of the type, built once on first use
    fn descriptor() -> &'static MessageDescriptor;

    /// Appends the tagged units of the field in `slot`.
    ///
    /// Slots outside of the descriptor's field table write nothing.
    fn write_slot<U: Target>(&self, slot: usize, buf: &mut U) -> usize;

    /// Folds the payload of one tagged unit into the field in `slot`.
    ///
    /// # Errors
    ///
    /// Besides propagating the field's own decode errors, returns
    /// [`InternalError::UnknownSlot`](crate::parse::error::InternalError::UnknownSlot)
    /// if `slot` is outside of the descriptor's field table.
    fn merge_slot<'a>(
        &mut self,
        slot: usize,
        cur: Cursor<'a>,
        ctx: &mut DecodeContext<'_>,
    ) -> ParseResult<Cursor<'a>>;

    /// Appends every field of `self`, in declaration order, with default
    /// values suppressed.
    fn write_fields<U: Target>(&self, buf: &mut U) -> usize {
        crate::encode::write_fields(self, buf)
    }

    /// Encodes `self` into a freshly allocated [`DataBlock`].
    #[must_use]
    fn encode(&self) -> DataBlock {
        crate::encode::encode(self)
    }

    /// Appends the encoding of `self` to an arbitrary [`Target`].
    fn write_to<U: Target>(&self, buf: &mut U) -> usize {
        self.write_fields(buf)
    }

    /// Computes, without allocation, the number of bytes that
    /// [`Message::encode`] would produce.
    #[must_use]
    fn encoded_len(&self) -> usize {
        self.write_fields(&mut ByteCounter::create())
    }

    /// Decodes fields from `cur` into `self` until `cur` is exhausted,
    /// returning the (empty) remainder.
    ///
    /// Unknown fields are skipped and logged at `debug` level. Fields present
    /// in `self` but absent from `cur` are left untouched; repeated fields
    /// are appended to.
    fn merge_from<'a>(&mut self, cur: Cursor<'a>) -> ParseResult<Cursor<'a>> {
        let config = DecodeConfig::default();
        let mut diagnostics = LogDiagnostics;
        let mut ctx = DecodeContext::new(&config, &mut diagnostics);
        self.merge_with(cur, &mut ctx)
    }

    /// Variant of [`Message::merge_from`] under an explicit [`DecodeContext`]
    fn merge_with<'a>(
        &mut self,
        cur: Cursor<'a>,
        ctx: &mut DecodeContext<'_>,
    ) -> ParseResult<Cursor<'a>> {
        crate::decode::merge_message(self, cur, ctx)
    }

    /// Decodes a complete message from `bytes`, starting from default values.
    ///
    /// # Errors
    ///
    /// Fails with [`TruncatedInput`](crate::parse::error::TruncatedInput) or
    /// [`ProtocolViolation`] as soon as either is encountered; no partial
    /// message is returned.
    fn decode(bytes: &[u8]) -> ParseResult<Self> {
        crate::decode::decode(bytes, &DecodeConfig::default(), &mut LogDiagnostics)
    }

    /// Variant of [`Message::decode`] with caller-supplied configuration, and
    /// a caller-supplied sink for unknown fields.
    fn decode_with(
        bytes: &[u8],
        config: &DecodeConfig,
        diagnostics: &mut dyn Diagnostics,
    ) -> ParseResult<Self> {
        crate::decode::decode(bytes, config, diagnostics)
    }

    /// Renders the `.proto`-style schema of this message type.
    #[must_use]
    fn schema() -> String {
        crate::schema::schema_of::<Self>()
    }
}

/// Newtype around `Vec<u8>` for fields of the `bytes` category
///
/// A bare `Vec<u8>` is a repeated `uint32` field, as is `Vec` of any
/// other integer type.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde_impls", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl DerefMut for Bytes {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.0
    }
}

/// Implements [`Field`] for a singular [`Value`] type
macro_rules! singular_field {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Field for $t {
                const KIND: FieldKind = FieldKind::Singular(<$t as Value>::KIND);

                #[inline]
                fn encode_field<U: Target>(&self, tag_id: u32, buf: &mut U) -> usize {
                    crate::encode::write_singular(self, tag_id, buf)
                }

                #[inline]
                fn merge_field<'a>(
                    &mut self,
                    cur: Cursor<'a>,
                    ctx: &mut DecodeContext<'_>,
                ) -> ParseResult<Cursor<'a>> {
                    crate::decode::merge_singular(self, cur, ctx)
                }
            }
        )+
    };
}

macro_rules! varint_value {
    ($t:ty, $kind:ident, |$w:ident| $enc:expr, |$r:ident| $dec:expr) => {
        impl Value for $t {
            const KIND: ValueKind = ValueKind::Scalar(ScalarKind::$kind);

            #[inline]
            fn is_default(&self) -> bool {
                *self == <$t>::default()
            }

            #[inline]
            fn write_value<U: Target>(&self, buf: &mut U) -> usize {
                let $w = *self;
                write_varint($enc, buf)
            }

            fn read_value<'a>(
                cur: Cursor<'a>,
                _: &mut DecodeContext<'_>,
            ) -> ParseResult<(Self, Cursor<'a>)> {
                let ($r, rest) = read_varint(cur)?;
                Ok(($dec, rest))
            }
        }

        singular_field!($t);
    };
}

varint_value!(bool, Bool, |b| b as u64, |raw| raw != 0);
varint_value!(i8, Int32, |x| x as i64 as u64, |raw| raw as i8);
varint_value!(i16, Int32, |x| x as i64 as u64, |raw| raw as i16);
varint_value!(i32, Int32, |x| x as i64 as u64, |raw| raw as i32);
varint_value!(i64, Int64, |x| x as u64, |raw| raw as i64);
varint_value!(u8, UInt32, |x| x as u64, |raw| raw as u8);
varint_value!(u16, UInt32, |x| x as u64, |raw| raw as u16);
varint_value!(u32, UInt32, |x| x as u64, |raw| raw as u32);
varint_value!(u64, UInt64, |x| x, |raw| raw);
varint_value!(Signed<i8>, SInt32, |x| zigzag_encode32(x.0 as i32) as u64, |raw| Signed(zigzag_decode32(raw as u32) as i8));
varint_value!(Signed<i16>, SInt32, |x| zigzag_encode32(x.0 as i32) as u64, |raw| Signed(zigzag_decode32(raw as u32) as i16));
varint_value!(Signed<i32>, SInt32, |x| zigzag_encode32(x.0) as u64, |raw| Signed(zigzag_decode32(raw as u32)));
varint_value!(Signed<i64>, SInt64, |x| zigzag_encode64(x.0), |raw| Signed(zigzag_decode64(raw)));

macro_rules! fixed_value {
    ($t:ty, $kind:ident, $write:ident, $read:ident, |$w:ident| $enc:expr, |$r:ident| $dec:expr) => {
        impl Value for $t {
            const KIND: ValueKind = ValueKind::Scalar(ScalarKind::$kind);

            #[inline]
            fn is_default(&self) -> bool {
                let $w = *self;
                $enc == 0
            }

            #[inline]
            fn write_value<U: Target>(&self, buf: &mut U) -> usize {
                let $w = *self;
                $write($enc, buf)
            }

            fn read_value<'a>(
                cur: Cursor<'a>,
                _: &mut DecodeContext<'_>,
            ) -> ParseResult<(Self, Cursor<'a>)> {
                let ($r, rest) = $read(cur)?;
                Ok(($dec, rest))
            }
        }

        singular_field!($t);
    };
}

fixed_value!(Fixed<bool>, Fixed32, write_fixed32, read_fixed32, |x| x.0 as u32, |raw| Fixed(raw != 0));
fixed_value!(Fixed<u8>, Fixed32, write_fixed32, read_fixed32, |x| x.0 as u32, |raw| Fixed(raw as u8));
fixed_value!(Fixed<u16>, Fixed32, write_fixed32, read_fixed32, |x| x.0 as u32, |raw| Fixed(raw as u16));
fixed_value!(Fixed<u32>, Fixed32, write_fixed32, read_fixed32, |x| x.0, |raw| Fixed(raw));
fixed_value!(Fixed<i8>, SFixed32, write_fixed32, read_fixed32, |x| x.0 as i32 as u32, |raw| Fixed(raw as i8));
fixed_value!(Fixed<i16>, SFixed32, write_fixed32, read_fixed32, |x| x.0 as i32 as u32, |raw| Fixed(raw as i16));
fixed_value!(Fixed<i32>, SFixed32, write_fixed32, read_fixed32, |x| x.0 as u32, |raw| Fixed(raw as i32));
fixed_value!(Fixed<u64>, Fixed64, write_fixed64, read_fixed64, |x| x.0, |raw| Fixed(raw));
fixed_value!(Fixed<i64>, SFixed64, write_fixed64, read_fixed64, |x| x.0 as u64, |raw| Fixed(raw as i64));
// Only positive zero is a default; `-0.0` is written out.
fixed_value!(f32, Float, write_fixed32, read_fixed32, |x| x.to_bits(), |raw| f32::from_bits(raw));
fixed_value!(f64, Double, write_fixed64, read_fixed64, |x| x.to_bits(), |raw| f64::from_bits(raw));

impl Value for String {
    const KIND: ValueKind = ValueKind::Scalar(ScalarKind::String);

    #[inline]
    fn is_default(&self) -> bool {
        self.is_empty()
    }

    fn write_value<U: Target>(&self, buf: &mut U) -> usize {
        write_delimited(self.as_bytes(), buf)
    }

    fn read_value<'a>(
        cur: Cursor<'a>,
        _: &mut DecodeContext<'_>,
    ) -> ParseResult<(Self, Cursor<'a>)> {
        let (payload, rest) = read_delimited(cur)?;
        match std::str::from_utf8(payload) {
            Ok(s) => Ok((s.to_owned(), rest)),
            Err(error) => Err(ProtocolViolation::InvalidUtf8 {
                offset: rest.offset() - payload.len(),
                error,
            }
            .into()),
        }
    }
}

impl Value for Bytes {
    const KIND: ValueKind = ValueKind::Scalar(ScalarKind::Bytes);

    #[inline]
    fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    fn write_value<U: Target>(&self, buf: &mut U) -> usize {
        write_delimited(&self.0, buf)
    }

    fn read_value<'a>(
        cur: Cursor<'a>,
        _: &mut DecodeContext<'_>,
    ) -> ParseResult<(Self, Cursor<'a>)> {
        let (payload, rest) = read_delimited(cur)?;
        Ok((Bytes(payload.to_vec()), rest))
    }
}

singular_field!(String, Bytes);

impl<T: Value> Value for Box<T> {
    const KIND: ValueKind = T::KIND;

    fn is_default(&self) -> bool {
        (**self).is_default()
    }

    fn write_value<U: Target>(&self, buf: &mut U) -> usize {
        (**self).write_value(buf)
    }

    fn read_value<'a>(
        cur: Cursor<'a>,
        ctx: &mut DecodeContext<'_>,
    ) -> ParseResult<(Self, Cursor<'a>)> {
        let (val, rest) = T::read_value(cur, ctx)?;
        Ok((Box::new(val), rest))
    }

    fn merge_value<'a>(
        &mut self,
        cur: Cursor<'a>,
        ctx: &mut DecodeContext<'_>,
    ) -> ParseResult<Cursor<'a>> {
        (**self).merge_value(cur, ctx)
    }

    fn write_unit<U: Target>(&self, tag_id: u32, buf: &mut U) -> usize {
        (**self).write_unit(tag_id, buf)
    }
}

impl<T: Value> Field for Box<T> {
    const KIND: FieldKind = FieldKind::Singular(T::KIND);

    fn encode_field<U: Target>(&self, tag_id: u32, buf: &mut U) -> usize {
        crate::encode::write_singular(&**self, tag_id, buf)
    }

    fn merge_field<'a>(
        &mut self,
        cur: Cursor<'a>,
        ctx: &mut DecodeContext<'_>,
    ) -> ParseResult<Cursor<'a>> {
        crate::decode::merge_singular(&mut **self, cur, ctx)
    }
}

/// Optional values are carried exactly like the value they wrap; `None` and
/// `Some` of a default value both encode to nothing, and so both decode to
/// `None`. Wrapping a message in `Option<Box<_>>` is the way to declare a
/// recursive message type.
impl<T: Value> Value for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn is_default(&self) -> bool {
        self.as_ref().map_or(true, Value::is_default)
    }

    fn write_value<U: Target>(&self, buf: &mut U) -> usize {
        match self {
            Some(val) => val.write_value(buf),
            None => T::default().write_value(buf),
        }
    }

    fn read_value<'a>(
        cur: Cursor<'a>,
        ctx: &mut DecodeContext<'_>,
    ) -> ParseResult<(Self, Cursor<'a>)> {
        let (val, rest) = T::read_value(cur, ctx)?;
        Ok((Some(val), rest))
    }

    fn merge_value<'a>(
        &mut self,
        cur: Cursor<'a>,
        ctx: &mut DecodeContext<'_>,
    ) -> ParseResult<Cursor<'a>> {
        self.get_or_insert_with(T::default).merge_value(cur, ctx)
    }

    fn write_unit<U: Target>(&self, tag_id: u32, buf: &mut U) -> usize {
        match self {
            Some(val) => val.write_unit(tag_id, buf),
            None => 0,
        }
    }
}

impl<T: Value> Field for Option<T> {
    const KIND: FieldKind = FieldKind::Singular(T::KIND);

    fn encode_field<U: Target>(&self, tag_id: u32, buf: &mut U) -> usize {
        crate::encode::write_singular(self, tag_id, buf)
    }

    fn merge_field<'a>(
        &mut self,
        cur: Cursor<'a>,
        ctx: &mut DecodeContext<'_>,
    ) -> ParseResult<Cursor<'a>> {
        crate::decode::merge_singular(self, cur, ctx)
    }
}

impl<T: Value> Field for Vec<T> {
    const KIND: FieldKind = FieldKind::Repeated(T::KIND);

    fn encode_field<U: Target>(&self, tag_id: u32, buf: &mut U) -> usize {
        crate::encode::write_repeated(self, tag_id, buf)
    }

    fn merge_field<'a>(
        &mut self,
        cur: Cursor<'a>,
        ctx: &mut DecodeContext<'_>,
    ) -> ParseResult<Cursor<'a>> {
        crate::decode::merge_repeated(self, cur, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex;

    fn unit<T: Value>(val: T, tag_id: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        let n = val.write_unit(tag_id, &mut buf);
        assert_eq!(n, buf.len());
        buf
    }

    fn read<T: Value>(bytes: &[u8]) -> ParseResult<T> {
        let config = DecodeConfig::default();
        let mut diag = LogDiagnostics;
        let mut ctx = DecodeContext::new(&config, &mut diag);
        let (val, rest) = T::read_value(Cursor::new(bytes), &mut ctx)?;
        assert!(rest.is_empty());
        Ok(val)
    }

    #[test]
    fn scalar_units() {
        assert_eq!(unit(true, 1), hex!("0801"));
        assert_eq!(unit(150u32, 2), hex!("109601"));
        assert_eq!(unit(150i64, 3), hex!("189601"));
        assert_eq!(unit(Signed(150i32), 4), hex!("20ac02"));
        assert_eq!(unit(-1i32, 1), hex!("08ffffffffffffffffff01"));
        assert_eq!(unit(Signed(-1i8), 1), hex!("0801"));
        assert_eq!(unit(Fixed(1u32), 1), hex!("0d01000000"));
        assert_eq!(unit(Fixed(1u8), 1), hex!("0d01000000"));
        assert_eq!(unit(Fixed(-2i16), 1), hex!("0dfeffffff"));
        assert_eq!(unit(Fixed(true), 2), hex!("1501000000"));
        assert!(unit(Fixed(false), 2).is_empty());
        assert_eq!(unit(Fixed(-2i64), 1), hex!("09feffffffffffffff"));
        assert_eq!(unit(1.0f32, 2), hex!("150000803f"));
        assert_eq!(unit(String::from("world"), 1), hex!("0a05776f726c64"));
        assert_eq!(unit(Bytes(vec![0xde, 0xad]), 3), hex!("1a02dead"));
    }

    #[test]
    fn defaults_suppressed() {
        assert!(unit(false, 1).is_empty());
        assert!(unit(0i32, 1).is_empty());
        assert!(unit(0u64, 1).is_empty());
        assert!(unit(Signed(0i64), 1).is_empty());
        assert!(unit(Fixed(0u32), 1).is_empty());
        assert!(unit(0.0f64, 1).is_empty());
        assert!(unit(String::new(), 1).is_empty());
        assert!(unit(Bytes::new(), 1).is_empty());
        assert_eq!(unit(-0.0f64, 1), hex!("090000000000000080"));
    }

    #[test]
    fn scalar_reads() {
        assert_eq!(read::<bool>(&hex!("02")), Ok(true));
        assert_eq!(read::<i32>(&hex!("ffffffffffffffffff01")), Ok(-1));
        // uint32 wider than 32 bits is truncated
        assert_eq!(read::<u32>(&hex!("8080808010")), Ok(0));
        assert_eq!(read::<Signed<i64>>(&hex!("fdffffffffffffff1f")), Ok(Signed(-0x0fff_ffff_ffff_ffff)));
        assert_eq!(read::<Fixed<i32>>(&hex!("ffffffff")), Ok(Fixed(-1)));
        assert_eq!(read::<Fixed<i8>>(&hex!("ffffffff")), Ok(Fixed(-1i8)));
        assert_eq!(read::<Fixed<u16>>(&hex!("34120000")), Ok(Fixed(0x1234u16)));
        assert_eq!(read::<Fixed<bool>>(&hex!("01000000")), Ok(Fixed(true)));
        assert_eq!(read::<f64>(&hex!("000000000000f03f")), Ok(1.0));
        assert_eq!(read::<String>(&hex!("03616263")), Ok("abc".to_owned()));
        assert_eq!(read::<Bytes>(&hex!("00")), Ok(Bytes::new()));
    }

    #[test]
    fn invalid_utf8() {
        let err = read::<String>(&hex!("02c328")).unwrap_err();
        assert!(matches!(
            err,
            crate::parse::ParseError::Violation(ProtocolViolation::InvalidUtf8 { offset: 1, .. })
        ));
    }

    #[test]
    fn repeated_is_unpacked() {
        let mut buf = Vec::new();
        vec![1u32, 0, 300].encode_field(5, &mut buf);
        // zero element suppressed, each remaining element individually tagged
        assert_eq!(buf, hex!("2801 28ac02"));
        assert!(<Vec<u32> as Field>::KIND.is_repeated());
        assert_eq!(<Vec<u32> as Field>::KIND.wire_type(), WireType::Varint);
    }
}
