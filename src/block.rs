//! Encoder output accumulator implemented as a newtype around `Vec<u8>`
//!
//! A [`DataBlock`] is created fresh for every top-level encode, and for every
//! nested message while its parent is being encoded, then handed to the
//! caller. It is append-only; nothing in this crate ever reads it back
//! except through [`DataBlock::as_slice`] and friends.

use std::borrow::Borrow;
use std::ops::Deref;

use crate::conv::target::Target;
use crate::hexstring::hex_of_bytes;

/// Newtype around `Vec<u8>` used as the output buffer of message encoding
///
/// Most of the methods on `DataBlock` are implemented directly on the
/// underlying `Vec<u8>`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Default, Hash)]
#[repr(transparent)]
pub struct DataBlock(Vec<u8>);

impl DataBlock {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(cap: usize) -> Self {
        Self(Vec::with_capacity(cap))
    }

    /// Returns the number of bytes contained in `self`
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Finalizes a `DataBlock` by destructing it
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Renders the contents as an undelimited lowercase hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex_of_bytes(&self.0)
    }

    /// Returns a [`Cursor`](crate::parse::Cursor) over the contents, for
    /// decoding what was just encoded.
    #[must_use]
    pub fn cursor(&self) -> crate::parse::Cursor<'_> {
        crate::parse::Cursor::new(&self.0)
    }
}

impl std::fmt::Debug for DataBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]{{{}}}", self.0.len(), self.to_hex())
    }
}

impl Deref for DataBlock {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for DataBlock {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Borrow<[u8]> for DataBlock {
    fn borrow(&self) -> &[u8] {
        self.0.borrow()
    }
}

impl From<DataBlock> for Vec<u8> {
    fn from(val: DataBlock) -> Self {
        val.0
    }
}

impl From<Vec<u8>> for DataBlock {
    fn from(buf: Vec<u8>) -> DataBlock {
        DataBlock(buf)
    }
}

impl From<&[u8]> for DataBlock {
    fn from(buf: &[u8]) -> DataBlock {
        DataBlock(buf.into())
    }
}

impl PartialEq<[u8]> for DataBlock {
    fn eq(&self, other: &[u8]) -> bool {
        self.0.as_slice() == other
    }
}

impl PartialEq<Vec<u8>> for DataBlock {
    fn eq(&self, other: &Vec<u8>) -> bool {
        &self.0 == other
    }
}

impl<const N: usize> PartialEq<[u8; N]> for DataBlock {
    fn eq(&self, other: &[u8; N]) -> bool {
        self.0.as_slice() == other.as_slice()
    }
}

impl std::io::Write for DataBlock {
    /// Calls `<Vec<u8> as Write>::write` on the inner vector
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.write(buf)
    }

    /// Calls `<Vec<u8> as Write>::flush` on the inner vector
    fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush()
    }
}

impl Target for DataBlock {
    /// Calls `<Vec<u8> as Target>::anticipate` on the inner vector
    fn anticipate(&mut self, extra: usize) {
        self.0.anticipate(extra)
    }

    /// Constructs a `DataBlock` via `<Vec<u8> as Target>::create`
    fn create() -> Self {
        Self(Vec::create())
    }

    /// Calls `<Vec<u8> as Target>::push_one` on the inner vector.
    fn push_one(&mut self, b: u8) -> usize {
        self.0.push_one(b)
    }

    /// Calls `<Vec<u8> as Target>::push_many` on the inner vector
    fn push_many<const N: usize>(&mut self, arr: [u8; N]) -> usize {
        self.0.push_many(arr)
    }

    /// Calls `<Vec<u8> as Target>::push_all` on the inner vector.
    fn push_all(&mut self, buf: &[u8]) -> usize {
        self.0.push_all(buf)
    }
}
