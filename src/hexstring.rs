//! Conversion to and from hex-encoded strings
//!
//! Golden vectors for the wire format are far easier to read and write as
//! hex-strings than as byte-array literals, so the tests, benchmarks and the
//! `protean-dump` binary all lean on the helpers in this module.
//!
//! By *hex-string* in this context, we mean a string of ASCII characters,
//! matching the regular expression `([0-9a-fA-F]{2})*`. Case is not
//! enforced, and two strings that are equivalent up to case represent
//! identical data. Output is always lowercase.

use crate::error::HexConvError;
use std::fmt::Write;

/// Formats a sequence of bytes into an undelimited hexadecimal `String`
///
/// # Examples
///
/// ```
/// # use protean::hexstring::hex_of_bytes;
/// assert_eq!(hex_of_bytes(&[0xde, 0xad, 0xbe, 0xef]), String::from("deadbeef"));
/// ```
#[must_use]
#[inline]
pub fn hex_of_bytes(bytes: &[u8]) -> String {
    let mut hex: String = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        match write!(&mut hex, "{byte:02x}") {
            Ok(_) => (),
            Err(_) => unreachable!("write to String should never fail"),
        };
    }
    hex
}

/// Attempt to parse a hexadecimally encoded string, returning either
/// a `Vec<u8>` holding the decoded bytes or an error containing the invalid
/// string.
///
/// ASCII whitespace is ignored, so that long vectors may be broken up
/// field-by-field for legibility.
///
/// # Errors
///
/// If the string (whitespace excluded) has odd parity, `Err(OddParity(s))` is
/// returned.
///
/// Otherwise, if the string contains any character that is not a valid
/// hexadecimal digit (case-insensitive), returns `Err(NonHex(s))`.
///
/// # Examples
///
/// ```
/// # use protean::hexstring::bytes_of_hex;
/// assert_eq!(Ok(vec![0xde, 0xad, 0xbe, 0xef]), bytes_of_hex("dead beef"));
/// ```
pub fn bytes_of_hex(src: &str) -> Result<Vec<u8>, HexConvError> {
    let digits: Vec<u8> = src
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    if digits.len() % 2 != 0 {
        return Err(HexConvError::OddParity(src.to_owned()));
    }

    let mut dst = Vec::with_capacity(digits.len() / 2);

    for pair in digits.chunks_exact(2) {
        match (nibble(pair[0]), nibble(pair[1])) {
            (Some(hi), Some(lo)) => dst.push((hi << 4) | lo),
            _ => return Err(HexConvError::NonHex(src.to_owned())),
        }
    }
    Ok(dst)
}

const fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Shorthand for converting a string literal into a `Vec<u8>` of the bytes it
/// encodes in hexadecimal
///
/// # Panics
///
/// Panics if the literal is not a valid hex-string. Intended for tests and
/// benchmarks, where the argument is a known-good constant.
#[macro_export]
macro_rules! hex {
    ($s:expr) => {
        match $crate::hexstring::bytes_of_hex($s) {
            Ok(bytes) => bytes,
            Err(err) => panic!("hex!: invalid literal: {err:?}"),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_conv() {
        assert_eq!(hex_of_bytes(&[]), "");
        assert_eq!(hex_of_bytes(&[0x0a, 0x05, 0xff]), "0a05ff");
        assert_eq!(bytes_of_hex("0A05fF"), Ok(vec![0x0a, 0x05, 0xff]));
        assert_eq!(bytes_of_hex("0a 05\nff"), Ok(vec![0x0a, 0x05, 0xff]));
        assert_eq!(
            bytes_of_hex("abc"),
            Err(HexConvError::OddParity("abc".to_owned()))
        );
        assert_eq!(
            bytes_of_hex("zz"),
            Err(HexConvError::NonHex("zz".to_owned()))
        );
        assert_eq!(crate::hex!("9601"), vec![0x96, 0x01]);
    }
}
