use std::io::{self, Write};
use std::process::ExitCode;

use protean::decode::DEFAULT_MAX_DEPTH;
use protean::raw::{RawField, RawFields, RawValue};
use protean::source::{read_blob, DecodeResult};
use protean::ParseResult;

/// Deepest level of nested payloads that is expanded
const MAX_NESTING: usize = DEFAULT_MAX_DEPTH;

/// Prints every tagged unit of `bytes`. Offsets of nested units are relative
/// to the payload that contains them.
fn dump<W: Write>(out: &mut W, bytes: &[u8]) -> DecodeResult<()> {
    for field in RawFields::new(bytes) {
        write_field(out, &field?, 0)?;
    }
    Ok(())
}

/// Writes one unit, descending into a delimited payload when it parses as a
/// complete run of tagged units and `depth` is below [`MAX_NESTING`].
fn write_field<W: Write>(out: &mut W, field: &RawField<'_>, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    writeln!(out, "{indent}{field}")?;
    let inner = match field.value {
        RawValue::Delimited(inner) if !inner.is_empty() => inner,
        _ => return Ok(()),
    };
    if depth < MAX_NESTING {
        if let Ok(children) = RawFields::new(inner).collect::<ParseResult<Vec<_>>>() {
            for child in &children {
                write_field(out, child, depth + 1)?;
            }
            return Ok(());
        }
    }
    if let Ok(text) = std::str::from_utf8(inner) {
        writeln!(out, "{indent}  {text:?}")?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let path = match std::env::args_os().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: protean-dump <FILE>");
            return ExitCode::FAILURE;
        }
    };

    let bytes = match read_blob(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("protean-dump: {err}");
            return ExitCode::FAILURE;
        }
    };

    log::debug!("loaded {} bytes from {}", bytes.len(), path.to_string_lossy());

    let stdout = io::stdout();
    match dump(&mut stdout.lock(), &bytes) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("protean-dump: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protean::hex;
    use protean::source::DecodeError;

    fn render(bytes: &[u8]) -> (String, DecodeResult<()>) {
        let mut out = Vec::new();
        let res = dump(&mut out, bytes);
        (String::from_utf8(out).unwrap(), res)
    }

    #[test]
    fn nested_and_text() {
        let (text, res) = render(&hex!("1203 0a0161 1001"));
        assert!(res.is_ok());
        assert_eq!(
            text,
            "@0: #2 DELIMITED = [3]{0a0161}\n\
             \x20 @0: #1 DELIMITED = [1]{61}\n\
             \x20   \"a\"\n\
             @5: #2 VARINT = 1\n"
        );
    }

    #[test]
    fn error_after_partial_output() {
        let (text, res) = render(&hex!("1001 0a05"));
        assert_eq!(text, "@0: #2 VARINT = 1\n");
        assert!(matches!(res, Err(DecodeError::Parse(_))));
    }

    #[test]
    fn nesting_is_bounded() {
        let mut bytes = hex!("0801");
        for _ in 0..MAX_NESTING + 50 {
            let mut outer = Vec::new();
            outer.push(0x0a);
            protean::prim::write_varint(bytes.len() as u64, &mut outer);
            outer.extend_from_slice(&bytes);
            bytes = outer;
        }
        let (text, res) = render(&bytes);
        assert!(res.is_ok());
        let deepest = text
            .lines()
            .map(|line| line.len() - line.trim_start().len())
            .max()
            .unwrap();
        assert!(deepest <= 2 * (MAX_NESTING + 1));
        assert!(text.lines().count() > MAX_NESTING);
    }
}
