//! Message encoder
//!
//! Encoding walks a message's descriptor in declaration order, asking the
//! message to write each slot. Every field writes zero or more tagged units:
//!
//!   * a singular field writes one unit, or none if its value is a default;
//!   * a repeated field writes one unit per element, suppressing default
//!     elements individually;
//!   * a nested message is first encoded into a buffer of its own, and
//!     written as a length-delimited unit only if that buffer is non-empty.
//!
//! A message whose fields are all defaults therefore encodes to zero bytes,
//! and vanishes entirely from any message that contains it.
//!
//! Encoding cannot fail.

use crate::block::DataBlock;
use crate::conv::target::Target;
use crate::conv::{Message, Value};
use crate::prim::write_delimited;
use crate::wire::{Tag, WireType};

/// Encodes `msg` into a freshly allocated [`DataBlock`].
#[must_use]
pub fn encode<M: Message>(msg: &M) -> DataBlock {
    let mut block = DataBlock::new();
    write_fields(msg, &mut block);
    log::trace!(
        "encoded `{}` into {} bytes",
        M::descriptor().name(),
        block.len()
    );
    block
}

/// Appends every field of `msg` to `buf`, in declaration order.
pub fn write_fields<M: Message, U: Target>(msg: &M, buf: &mut U) -> usize {
    let mut written = 0;
    for slot in 0..M::descriptor().len() {
        written += msg.write_slot(slot, buf);
    }
    written
}

fn encode_nested<M: Message>(msg: &M) -> DataBlock {
    let mut inner = DataBlock::new();
    write_fields(msg, &mut inner);
    inner
}

/// Writes one tagged unit for a singular field, unless `val` is a default.
#[inline]
pub fn write_singular<T: Value, U: Target>(val: &T, tag_id: u32, buf: &mut U) -> usize {
    val.write_unit(tag_id, buf)
}

/// Writes one tagged unit per non-default element of a repeated field.
pub fn write_repeated<T: Value, U: Target>(vals: &[T], tag_id: u32, buf: &mut U) -> usize {
    let mut written = 0;
    for val in vals {
        written += val.write_unit(tag_id, buf);
    }
    written
}

/// Writes a nested message as a length-delimited unit, unless it encodes to
/// nothing.
pub fn write_nested<M: Message, U: Target>(msg: &M, tag_id: u32, buf: &mut U) -> usize {
    let inner = encode_nested(msg);
    if inner.is_empty() {
        return 0;
    }
    Tag::new(tag_id, WireType::Delimited).write_to(buf) + write_delimited(&inner, buf)
}

/// Writes the untagged, length-prefixed payload of a nested message.
pub fn write_nested_value<M: Message, U: Target>(msg: &M, buf: &mut U) -> usize {
    let inner = encode_nested(msg);
    write_delimited(&inner, buf)
}
