// src/parser/literal.rs
// Lexeme -> value. The scanner only guarantees the shape of a literal; range
// checks and escape resolution happen here.

use std::num::IntErrorKind;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("integer literal out of range")]
    IntegerLiteralOutOfRange,
    #[error("unknown escape sequence `\\{0}`")]
    UnknownEscape(char),
    #[error("malformed literal")]
    Malformed,
}

fn unescape(b: u8, quote: u8) -> Result<u8, LiteralError> {
    Ok(match b {
        b'n' => b'\n',
        b't' => b'\t',
        b'f' => 0x0c,
        b'r' => b'\r',
        b'\\' => b'\\',
        q if q == quote => quote,
        other => return Err(LiteralError::UnknownEscape(char::from(other))),
    })
}

fn unquote(lexeme: &[u8], quote: u8) -> Result<&[u8], LiteralError> {
    match lexeme {
        [open, body @ .., close] if *open == quote && *close == quote => Ok(body),
        _ => Err(LiteralError::Malformed),
    }
}

fn decode_body(body: &[u8], quote: u8) -> Result<Vec<u8>, LiteralError> {
    let mut out = Vec::with_capacity(body.len());
    let mut it = body.iter();
    while let Some(&b) = it.next() {
        if b == b'\\' {
            let &e = it.next().ok_or(LiteralError::Malformed)?;
            out.push(unescape(e, quote)?);
        } else {
            out.push(b);
        }
    }
    Ok(out)
}

/// `"..."` -> contents with `\n \t \f \r \\ \"` resolved.
pub fn decode_string(lexeme: &[u8]) -> Result<String, LiteralError> {
    let bytes = decode_body(unquote(lexeme, b'"')?, b'"')?;
    String::from_utf8(bytes).map_err(|_| LiteralError::Malformed)
}

/// `'x'` or `'\x'` -> one byte.
pub fn decode_char(lexeme: &[u8]) -> Result<u8, LiteralError> {
    match decode_body(unquote(lexeme, b'\'')?, b'\'')?.as_slice() {
        [b] => Ok(*b),
        _ => Err(LiteralError::Malformed),
    }
}

// Strip the type suffix and the `'` digit-group separators.
fn digits(lexeme: &[u8], suffix: &[u8]) -> Result<String, LiteralError> {
    let body = lexeme.strip_suffix(suffix).ok_or(LiteralError::Malformed)?;
    let s: String = body
        .iter()
        .filter(|&&b| b != b'\'')
        .map(|&b| char::from(b))
        .collect();
    if s.is_empty() {
        return Err(LiteralError::Malformed);
    }
    Ok(s)
}

fn int_error(kind: &IntErrorKind) -> LiteralError {
    match kind {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            LiteralError::IntegerLiteralOutOfRange
        }
        _ => LiteralError::Malformed,
    }
}

/// `1'000_u64` -> 1000.
pub fn decode_unsigned(lexeme: &[u8]) -> Result<u64, LiteralError> {
    digits(lexeme, b"_u64")?
        .parse::<u64>()
        .map_err(|e| int_error(e.kind()))
}

/// `-1'000_i64` -> -1000.
pub fn decode_signed(lexeme: &[u8]) -> Result<i64, LiteralError> {
    digits(lexeme, b"_i64")?
        .parse::<i64>()
        .map_err(|e| int_error(e.kind()))
}
