//! Consume-and-advance parsing model with byte-level precision
//!
//! This module provides [`Cursor`], the read-side dual of
//! [`Target`](crate::conv::target::Target). A `Cursor` is a borrowed,
//! immutable view over a byte buffer together with the absolute offset of
//! that view within the top-level buffer it was derived from.
//!
//! # Model
//!
//!  * A `Cursor` never owns or mutates the bytes it views.
//!  * Every read consumes `self` and, on success, returns the value read
//!    alongside a new `Cursor` over the bytes that remain. On failure the
//!    original cursor is simply dropped; no partially-advanced state exists.
//!  * Parsing is non-backtracking: a byte can only be inspected by consuming it.
//!  * [`Cursor::split`] carves a bounded sub-view off the front of the
//!    cursor. This is how length-delimited payloads are isolated, so that a
//!    nested decode can never consume bytes belonging to its parent.
//!
//! Because `Cursor` is `Copy`, a caller that wishes to retry or peek may
//! keep its own copy of the cursor from before a read.

pub mod error;

pub use error::{ParseError, ParseResult};
use error::TruncatedInput;

/// Borrowed view over unread bytes with a monotonically advancing position
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Constructs a cursor positioned at the first byte of `buf`
    #[inline]
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Absolute position of the next unread byte, measured from the start of
    /// the top-level buffer this cursor was derived from.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes that remain unread in this view
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the unread bytes of this view without consuming them
    #[inline]
    #[must_use]
    pub const fn as_slice(&self) -> &'a [u8] {
        self.buf
    }

    fn truncated(&self, requested: u64) -> TruncatedInput {
        TruncatedInput {
            offset: self.offset,
            requested,
            available: self.buf.len(),
        }
    }

    /// Consumes a single byte.
    pub fn take_byte(self) -> ParseResult<(u8, Self)> {
        match self.buf.split_first() {
            Some((&byte, rest)) => Ok((
                byte,
                Self {
                    buf: rest,
                    offset: self.offset + 1,
                },
            )),
            None => Err(self.truncated(1).into()),
        }
    }

    /// Consumes exactly `n` bytes and returns them as a slice borrowed from
    /// the underlying buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TruncatedInput`] without consuming anything if fewer than
    /// `n` bytes remain.
    pub fn take(self, n: usize) -> ParseResult<(&'a [u8], Self)> {
        if n > self.buf.len() {
            return Err(self.truncated(n as u64).into());
        }
        let (head, rest) = self.buf.split_at(n);
        Ok((
            head,
            Self {
                buf: rest,
                offset: self.offset + n,
            },
        ))
    }

    /// Consumes `N` bytes and returns them in array-form
    pub fn take_array<const N: usize>(self) -> ParseResult<([u8; N], Self)> {
        let (head, rest) = self.take(N)?;
        let mut arr = [0u8; N];
        arr.copy_from_slice(head);
        Ok((arr, rest))
    }

    /// Consumes a length `len` declared on the wire, which may exceed the
    /// address space; the check against the remaining view is performed
    /// before any conversion to `usize`.
    pub fn take_declared(self, len: u64) -> ParseResult<(&'a [u8], Self)> {
        match usize::try_from(len) {
            Ok(n) if n <= self.buf.len() => self.take(n),
            _ => Err(self.truncated(len).into()),
        }
    }

    /// Splits off the next `len` bytes as an independent sub-cursor,
    /// returning it along with a cursor over whatever follows.
    ///
    /// The sub-cursor keeps absolute offsets, so errors raised while reading
    /// it point into the top-level buffer.
    pub fn split(self, len: u64) -> ParseResult<(Self, Self)> {
        let start = self.offset;
        let (head, rest) = self.take_declared(len)?;
        Ok((
            Self {
                buf: head,
                offset: start,
            },
            rest,
        ))
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cursor@{}[{}]{{{}}}",
            self.offset,
            self.buf.len(),
            crate::hexstring::hex_of_bytes(self.buf)
        )
    }
}

impl<'a> From<&'a [u8]> for Cursor<'a> {
    fn from(buf: &'a [u8]) -> Self {
        Self::new(buf)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Cursor<'a> {
    fn from(buf: &'a [u8; N]) -> Self {
        Self::new(buf)
    }
}

impl<'a> From<&'a Vec<u8>> for Cursor<'a> {
    fn from(buf: &'a Vec<u8>) -> Self {
        Self::new(buf.as_slice())
    }
}
