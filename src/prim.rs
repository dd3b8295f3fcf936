//! Primitive value codec
//!
//! Free functions that write the four wire encodings into any [`Target`] and
//! read them back off a [`Cursor`]. Everything above this layer (scalar
//! [`Value`](crate::conv::Value) impls, tags, and the message encoder and
//! decoder) bottoms out here.
//!
//! # Varints
//!
//! Base-128, least-significant group first, with the high bit of each byte
//! flagging that another byte follows. Values are always treated as `u64` on
//! the wire, so a varint is at most [`MAX_VARINT_LEN`] bytes long; decoding
//! rejects anything longer, and a tenth byte carrying more than the single
//! remaining bit, with [`VarintOverflow`].
//!
//! [`VarintOverflow`]: crate::parse::error::ProtocolViolation::VarintOverflow

use crate::conv::target::Target;
use crate::parse::error::ProtocolViolation;
use crate::parse::{Cursor, ParseResult};
use crate::wire::WireType;

/// Longest legal encoding of a `u64` varint
pub const MAX_VARINT_LEN: usize = 10;

/// Appends the varint encoding of `val` to `buf`, returning the number of
/// bytes written.
pub fn write_varint<U: Target>(mut val: u64, buf: &mut U) -> usize {
    let mut n = 0;
    while val >= 0x80 {
        n += buf.push_one((val as u8) | 0x80);
        val >>= 7;
    }
    n + buf.push_one(val as u8)
}

/// Number of bytes [`write_varint`] would emit for `val`.
#[must_use]
pub const fn varint_len(val: u64) -> usize {
    if val == 0 {
        1
    } else {
        (64 - val.leading_zeros() as usize + 6) / 7
    }
}

/// Consumes one varint from the front of `cur`.
///
/// # Errors
///
/// Returns [`TruncatedInput`](crate::parse::error::TruncatedInput) if the
/// cursor is exhausted while the continuation bit is still set, and
/// [`ProtocolViolation::VarintOverflow`] if the encoding does not fit in 64 bits.
pub fn read_varint(cur: Cursor<'_>) -> ParseResult<(u64, Cursor<'_>)> {
    let start = cur.offset();
    let mut acc: u64 = 0;
    let mut cur = cur;
    for ix in 0..MAX_VARINT_LEN {
        let (byte, rest) = cur.take_byte()?;
        cur = rest;
        if ix == MAX_VARINT_LEN - 1 && byte > 0x01 {
            break;
        }
        acc |= u64::from(byte & 0x7f) << (7 * ix);
        if byte & 0x80 == 0 {
            return Ok((acc, cur));
        }
    }
    Err(ProtocolViolation::VarintOverflow { offset: start }.into())
}

/// Maps a signed 32-bit integer onto the unsigned integers such that small
/// magnitudes, positive or negative, map to small values.
#[inline]
#[must_use]
pub const fn zigzag_encode32(val: i32) -> u32 {
    ((val << 1) ^ (val >> 31)) as u32
}

#[inline]
#[must_use]
pub const fn zigzag_decode32(raw: u32) -> i32 {
    ((raw >> 1) as i32) ^ -((raw & 1) as i32)
}

/// 64-bit analogue of [`zigzag_encode32`]
#[inline]
#[must_use]
pub const fn zigzag_encode64(val: i64) -> u64 {
    ((val << 1) ^ (val >> 63)) as u64
}

#[inline]
#[must_use]
pub const fn zigzag_decode64(raw: u64) -> i64 {
    ((raw >> 1) as i64) ^ -((raw & 1) as i64)
}

#[inline]
pub fn write_fixed32<U: Target>(val: u32, buf: &mut U) -> usize {
    buf.push_many(val.to_le_bytes())
}

#[inline]
pub fn write_fixed64<U: Target>(val: u64, buf: &mut U) -> usize {
    buf.push_many(val.to_le_bytes())
}

pub fn read_fixed32(cur: Cursor<'_>) -> ParseResult<(u32, Cursor<'_>)> {
    let (arr, rest) = cur.take_array::<4>()?;
    Ok((u32::from_le_bytes(arr), rest))
}

pub fn read_fixed64(cur: Cursor<'_>) -> ParseResult<(u64, Cursor<'_>)> {
    let (arr, rest) = cur.take_array::<8>()?;
    Ok((u64::from_le_bytes(arr), rest))
}

/// Appends a varint length prefix followed by `bytes` itself.
pub fn write_delimited<U: Target>(bytes: &[u8], buf: &mut U) -> usize {
    buf.anticipate(varint_len(bytes.len() as u64) + bytes.len());
    write_varint(bytes.len() as u64, buf) + buf.push_all(bytes)
}

/// Consumes a varint length prefix and exactly that many bytes.
///
/// # Errors
///
/// The declared length is checked against the remaining input before
/// anything is sliced; a length that overruns the cursor is reported as
/// [`TruncatedInput`](crate::parse::error::TruncatedInput).
pub fn read_delimited(cur: Cursor<'_>) -> ParseResult<(&[u8], Cursor<'_>)> {
    let (len, cur) = read_varint(cur)?;
    cur.take_declared(len)
}

/// Discards one payload of the given wire type, returning the cursor
/// positioned at the next tag.
pub fn skip_value(wire_type: WireType, cur: Cursor<'_>) -> ParseResult<Cursor<'_>> {
    let rest = match wire_type {
        WireType::Varint => read_varint(cur)?.1,
        WireType::Fixed64 => cur.take(8)?.1,
        WireType::Delimited => read_delimited(cur)?.1,
        WireType::Fixed32 => cur.take(4)?.1,
    };
    Ok(rest)
}
