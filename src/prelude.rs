//! Assorted imports for modules that declare or transcode messages
//!
//! ```
//! use protean::prelude::*;
//!
//! #[derive(Message, Default, Debug, PartialEq)]
//! struct Ping {
//!     #[proto(tag = 1)]
//!     seq: u32,
//! }
//!
//! let bytes = Ping { seq: 150 }.encode();
//! assert_eq!(bytes.as_slice(), &[0x08, 0x96, 0x01]);
//! assert_eq!(Ping::decode(&bytes), Ok(Ping { seq: 150 }));
//! ```

pub use crate::block::DataBlock;
pub use crate::conv::target::Target;
pub use crate::conv::{Bytes, Field, Message, Value};
pub use crate::decode::{
    CollectDiagnostics, DecodeConfig, DecodeContext, Diagnostics, LogDiagnostics, UnknownField,
    UnknownFieldPolicy,
};
pub use crate::enumeration::Enumeration;
pub use crate::int::{Fixed, Signed};
pub use crate::parse::error::{ParseError, ProtocolViolation};
pub use crate::parse::{Cursor, ParseResult};

pub use ::enumeration_derive::Enumeration;
pub use ::message_derive::Message;
