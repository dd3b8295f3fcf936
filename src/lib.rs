//! Derive-driven model for transcoding Rust records to and from the protobuf
//! binary wire format
//!
//! # Overview
//!
//! This library lets plain Rust structs and enums be serialized to, and
//! deserialized from, bytes that are interoperable with any conforming
//! protobuf implementation, without a `.proto` compiler and without
//! hand-written per-type codec logic.
//!
//! A record opts in by deriving [`Message`](macro@Message), annotating each
//! field with its field number. The derive builds, once per type, a
//! [`MessageDescriptor`](descriptor::MessageDescriptor) naming each field,
//! its number and its value category, together with slot-wise accessors that
//! let the generic [`encode`] and [`decode`] modules reach each field without
//! knowing the concrete type.
//!
//! ```
//! use protean::prelude::*;
//!
//! #[derive(Message, Default, Debug, PartialEq)]
//! struct HelloWorld {
//!     #[proto(tag = 1)]
//!     name: String,
//!     #[proto(tag = 2)]
//!     var32: i32,
//!     #[proto(tag = 4)]
//!     s32: Signed<i32>,
//! }
//!
//! let msg = HelloWorld {
//!     name: "world".to_owned(),
//!     var32: 150,
//!     s32: Signed(150),
//! };
//! let bytes = msg.encode();
//! assert_eq!(bytes.to_hex(), "0a05776f726c6410960120ac02");
//! assert_eq!(HelloWorld::decode(&bytes), Ok(msg));
//! ```
//!
//! # Wire format
//!
//! Every field is written as a *tag* (field number and wire type) followed by
//! a payload:
//!
//!   * integers, booleans and enumerations as base-128 varints, with
//!     [`Signed`](int::Signed) integers zigzag-mapped first;
//!   * [`Fixed`](int::Fixed) integers and floating-point values as 4 or 8
//!     little-endian bytes;
//!   * strings, byte-strings and nested messages as a varint length followed
//!     by that many bytes.
//!
//! Fields holding their type's default value are omitted entirely, so a
//! message whose fields are all defaults encodes to zero bytes. Repeated
//! fields are written one tagged unit per element, never packed.
//!
//! By default, tags are a single byte, which limits field numbers to `1..=15`.
//! Enabling the `varint_tags` feature lifts that limit to the protobuf maximum
//! of `2^29 - 1`.
//!
//! # Decoding
//!
//! Decoding reads a message from an untrusted byte slice through a
//! bounds-checked [`Cursor`](parse::Cursor). Unknown fields are skipped by
//! wire type and reported to a [`Diagnostics`](decode::Diagnostics) sink;
//! every malformed input is reported as a [`ParseError`](parse::ParseError)
//! rather than a panic. Nesting depth is bounded by
//! [`DecodeConfig`](decode::DecodeConfig).

extern crate self as protean;

pub mod block;
pub mod conv;
pub mod decode;
pub mod descriptor;
pub mod encode;
pub mod enumeration;
pub mod error;
pub mod hexstring;
pub mod int;
pub mod parse;
pub mod prelude;
pub mod prim;
pub mod raw;
pub mod schema;
pub mod source;
pub mod wire;

pub use crate::block::DataBlock;
pub use crate::conv::{target::Target, Bytes, Field, Message, Value};
pub use crate::decode::{DecodeConfig, DecodeContext, Diagnostics, UnknownFieldPolicy};
pub use crate::descriptor::{FieldDescriptor, FieldKind, MessageDescriptor, ValueKind};
pub use crate::enumeration::{EnumDescriptor, Enumeration};
pub use crate::int::{Fixed, Signed};
pub use crate::parse::{error::ParseError, Cursor, ParseResult};
pub use crate::wire::{ScalarKind, Tag, WireType};

pub use ::enumeration_derive::Enumeration;
pub use ::lazy_static::lazy_static;
pub use ::message_derive::Message;
