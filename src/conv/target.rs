//! Byte sinks that encoded messages are written into

/// Append-only byte buffer that the encoder writes tagged units into
///
/// Unlike [`std::io::Write`], every append is infallible and complete. The
/// returned counts are summed by the encoder to report how many bytes a
/// message or field occupied, and are never used to signal a short write.
pub trait Target {
    /// Hints that `extra` more bytes are about to be appended.
    ///
    /// Sinks without a notion of capacity ignore this.
    fn anticipate(&mut self, extra: usize);

    /// Returns a new, empty sink.
    fn create() -> Self;

    /// Appends one byte, returning `1`.
    fn push_one(&mut self, b: u8) -> usize;

    /// Appends a fixed-width run of bytes, such as the little-endian form of
    /// a `fixed64`, returning `N`.
    ///
    /// Equivalent to calling [`Target::push_one`] on each byte in order.
    fn push_many<const N: usize>(&mut self, arr: [u8; N]) -> usize;

    /// Appends a slice, such as the payload of a `string` field, returning
    /// its length.
    fn push_all(&mut self, buf: &[u8]) -> usize;
}

/// Sink that discards its input, used by
/// [`Message::encoded_len`](crate::conv::Message::encoded_len) to measure a
/// message without allocating.
pub type ByteCounter = std::io::Sink;

impl Target for ByteCounter {
    #[inline(always)]
    fn anticipate(&mut self, _: usize) {}

    #[inline]
    fn create() -> Self {
        std::io::sink()
    }

    #[inline(always)]
    fn push_one(&mut self, _: u8) -> usize {
        1
    }

    #[inline(always)]
    fn push_many<const N: usize>(&mut self, _: [u8; N]) -> usize {
        N
    }

    #[inline(always)]
    fn push_all(&mut self, buf: &[u8]) -> usize {
        buf.len()
    }
}

impl Target for Vec<u8> {
    #[inline]
    fn anticipate(&mut self, extra: usize) {
        self.reserve(extra)
    }

    #[inline]
    fn create() -> Self {
        Self::new()
    }

    #[inline]
    fn push_one(&mut self, b: u8) -> usize {
        self.push(b);
        1
    }

    #[inline]
    fn push_many<const N: usize>(&mut self, arr: [u8; N]) -> usize {
        self.extend(&arr);
        N
    }

    #[inline]
    fn push_all(&mut self, buf: &[u8]) -> usize {
        self.extend_from_slice(buf);
        buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_agrees_with_vec() {
        let mut vec: Vec<u8> = Vec::create();
        let mut counter: ByteCounter = ByteCounter::create();
        let written = vec.push_one(0x0a) + vec.push_many([0x01, 0x02]) + vec.push_all(b"abc");
        let counted =
            counter.push_one(0x0a) + counter.push_many([0x01, 0x02]) + counter.push_all(b"abc");
        assert_eq!(written, 6);
        assert_eq!(written, counted);
        assert_eq!(vec, [0x0a, 0x01, 0x02, b'a', b'b', b'c']);
    }
}
