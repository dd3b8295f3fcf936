//! Enumerated field types
//!
//! A fieldless Rust `enum` becomes a protobuf enumeration by deriving
//! [`Enumeration`](macro@crate::Enumeration):
//!
//! ```
//! use protean::prelude::*;
//!
//! #[derive(Enumeration, Clone, Copy, Debug, PartialEq, Eq)]
//! enum PhoneType {
//!     #[proto(name = "MOBILE")]
//!     Mobile = 0,
//!     #[proto(name = "HOME")]
//!     Home = 1,
//!     #[proto(name = "WORK")]
//!     Work = 2,
//! }
//!
//! assert_eq!(PhoneType::default(), PhoneType::Mobile);
//! assert_eq!(PhoneType::from_value(2), Some(PhoneType::Work));
//! assert_eq!(PhoneType::Home.name(), "HOME");
//! ```
//!
//! Enumerations are carried on the wire as `int32` varints of their declared
//! discriminant. The variant whose discriminant is `0` is the default, and is
//! suppressed on encode like any other default value; deriving fails to
//! compile if no such variant is declared. The derive supplies `Default`
//! itself, so it must not also be derived.

use crate::conv::target::Target;
use crate::parse::error::ProtocolViolation;
use crate::parse::{Cursor, ParseResult};
use crate::prim::{read_varint, write_varint};

/// Trait for fieldless enumerations that may appear as message fields.
///
/// Normally derived. Besides the trait itself, the derive macro emits the
/// `Default`, [`Value`](crate::conv::Value) and
/// [`Field`](crate::conv::Field) implementations that let the type be
/// used directly, or in a `Vec`, as a message field.
pub trait Enumeration: Copy + 'static {
    /// Display name of the enumeration
    const NAME: &'static str;

    /// Every variant, in declaration order
    const VARIANTS: &'static [Self];

    /// Declared discriminant of `self`
    fn value(self) -> i32;

    /// Display name of the variant `self`
    fn name(self) -> &'static str;

    /// Variant with discriminant `value`, if one is declared
    fn from_value(value: i32) -> Option<Self>;

    fn descriptor() -> &'static EnumDescriptor;

    /// Iterates over every variant, in declaration order.
    #[must_use]
    fn iter() -> EnumIter<Self> {
        EnumIter {
            variants: Self::VARIANTS.iter(),
        }
    }
}

/// Writes the discriminant of `val` as an `int32` varint.
#[doc(hidden)]
pub fn write_enum<E: Enumeration, U: Target>(val: E, buf: &mut U) -> usize {
    write_varint(val.value() as i64 as u64, buf)
}

/// Reads an `int32` varint and maps it onto a declared variant.
#[doc(hidden)]
pub fn read_enum<E: Enumeration>(cur: Cursor<'_>) -> ParseResult<(E, Cursor<'_>)> {
    let (raw, rest) = read_varint(cur)?;
    let value = raw as i32;
    match E::from_value(value) {
        Some(val) => Ok((val, rest)),
        None => Err(ProtocolViolation::UnknownEnumValue {
            enumeration: E::NAME,
            value,
        }
        .into()),
    }
}

/// Iterator over the variants of an [`Enumeration`]
#[derive(Debug, Clone)]
pub struct EnumIter<E: 'static> {
    variants: std::slice::Iter<'static, E>,
}

impl<E: Enumeration> Iterator for EnumIter<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        self.variants.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.variants.size_hint()
    }
}

impl<E: Enumeration> ExactSizeIterator for EnumIter<E> {}

impl<E: Enumeration> DoubleEndedIterator for EnumIter<E> {
    fn next_back(&mut self) -> Option<E> {
        self.variants.next_back().copied()
    }
}

/// Name and discriminant of one variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValueDescriptor {
    pub name: &'static str,
    pub value: i32,
}

/// Type-erased view of an [`Enumeration`], as consulted by the schema printer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumDescriptor {
    name: &'static str,
    variants: &'static [EnumValueDescriptor],
}

impl EnumDescriptor {
    #[must_use]
    pub const fn new(name: &'static str, variants: &'static [EnumValueDescriptor]) -> Self {
        Self { name, variants }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn variants(&self) -> &'static [EnumValueDescriptor] {
        self.variants
    }

    /// Looks up the display name of the variant with discriminant `value`.
    #[must_use]
    pub fn name_of(&self, value: i32) -> Option<&'static str> {
        self.variants
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.name)
    }
}
