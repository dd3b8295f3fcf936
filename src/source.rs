//! Loading encoded messages from files and readers
//!
//! The codec itself only ever operates on in-memory byte slices; the helpers
//! in this module fetch those bytes from the file-system or from an arbitrary
//! [`Read`] implementor, and decode them in one step.

use std::fmt::{self, Display};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::conv::Message;
use crate::parse::error::ParseError;

/// Failure to load or to decode an encoded message
#[derive(Debug)]
pub enum DecodeError {
    Io(io::Error),
    Parse(ParseError),
}

pub type DecodeResult<T> = Result<T, DecodeError>;

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ParseError> for DecodeError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Io(err) => write!(f, "cannot read encoded message: {err}"),
            DecodeError::Parse(err) => write!(f, "cannot decode message: {err}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Io(err) => Some(err),
            DecodeError::Parse(err) => Some(err),
        }
    }
}

/// Reads the entire contents of the file at `path`.
///
/// # Errors
///
/// Fails if `path` does not exist, is not a regular file, or cannot be read.
pub fn read_blob(path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
    let path = path.as_ref();
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            log::warn!("cannot load {}: {err}", path.display());
            return Err(err);
        }
    };
    if !meta.is_file() {
        log::warn!("cannot load {}: not a regular file", path.display());
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a regular file", path.display()),
        ));
    }
    fs::read(path)
}

/// Reads and decodes a message of type `M` from the file at `path`.
pub fn decode_file<M: Message>(path: impl AsRef<Path>) -> DecodeResult<M> {
    let bytes = read_blob(path)?;
    Ok(M::decode(&bytes)?)
}

/// Drains `reader` and decodes its contents as a message of type `M`.
pub fn decode_reader<M: Message, R: Read>(mut reader: R) -> DecodeResult<M> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(M::decode(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex;
    use crate::prelude::*;

    #[derive(Message, Default, Debug, PartialEq)]
    struct Greeting {
        #[proto(tag = 1)]
        name: String,
        #[proto(tag = 2)]
        times: u32,
    }

    #[test]
    fn from_reader() {
        let bytes = hex!("0a05776f726c64 1003");
        let msg: Greeting = decode_reader(io::Cursor::new(bytes)).unwrap();
        assert_eq!(
            msg,
            Greeting {
                name: "world".to_owned(),
                times: 3
            }
        );

        let err = decode_reader::<Greeting, _>(&[0x0a, 0x05][..]).unwrap_err();
        assert!(matches!(err, DecodeError::Parse(ParseError::Truncated(_))));
    }

    #[test]
    fn missing_and_irregular_files() {
        let missing = std::env::temp_dir().join("protean-source-test-missing.bin");
        let _ = fs::remove_file(&missing);
        assert!(matches!(
            decode_file::<Greeting>(&missing),
            Err(DecodeError::Io(_))
        ));

        let err = read_blob(std::env::temp_dir()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn errors_are_thread_safe() {
        fn check<E: std::error::Error + Send + Sync + 'static>() {}
        check::<DecodeError>();
        check::<ParseError>();
        check::<crate::error::DescriptorError>();
        check::<crate::error::HexConvError>();
    }
}
