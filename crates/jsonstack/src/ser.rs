//! Compact JSON serialization of [`Value`] trees.
//!
//! Output has no insignificant whitespace. Strings escape `"`, `\`, `/` and
//! the five short control escapes (`\b \f \n \r \t`); every other byte is
//! written as is, so output parses back with [`crate::parse`] without needing
//! `\u` escapes. Numbers use the shortest representation that reads back to
//! the same `f64`, switching to exponent notation outside `[1e-5, 1e16)`.
//! Non-finite numbers and the [`Value::None`] sentinel are written as `null`.
//!
//! Nesting is walked with an explicit stack, so deep trees do not recurse.
use alloc::vec::Vec;
use core::{fmt, slice};

use bstr::ByteSlice;

use crate::{Value, error::AllocError, map};

/// Serializes `value` by appending to `out`.
///
/// # Errors
///
/// Returns [`AllocError`] if `out` cannot grow. Bytes written before the
/// failure stay in `out`.
///
/// ```
/// use jsonstack::{parse, ser::write_json};
///
/// let v = parse(br#"{ "a" : [1, 2.5, "x\/y"] }"#).unwrap();
/// let mut out = Vec::new();
/// write_json(&v, &mut out).unwrap();
/// assert_eq!(out, br#"{"a":[1,2.5,"x\/y"]}"#);
/// ```
pub fn write_json(value: &Value, out: &mut Vec<u8>) -> Result<(), AllocError> {
    write_value(value, &mut ByteWriter(out)).map_err(|fmt::Error| AllocError)
}

/// Serializes `value` into a formatter. Invalid UTF-8 inside strings is
/// rendered with replacement characters.
///
/// # Errors
///
/// Propagates formatter errors.
pub fn write_json_fmt(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_value(value, f)
}

impl Value {
    /// Serializes the value into a new byte vector.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the output cannot be allocated.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, AllocError> {
        let mut out = Vec::new();
        write_json(self, &mut out)?;
        Ok(out)
    }
}

trait Sink: fmt::Write {
    fn write_bytes(&mut self, bytes: &[u8]) -> fmt::Result;
}

struct ByteWriter<'a>(&'a mut Vec<u8>);

impl fmt::Write for ByteWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes())
    }
}

impl Sink for ByteWriter<'_> {
    fn write_bytes(&mut self, bytes: &[u8]) -> fmt::Result {
        self.0.try_reserve(bytes.len()).map_err(|_| fmt::Error)?;
        self.0.extend_from_slice(bytes);
        Ok(())
    }
}

impl Sink for fmt::Formatter<'_> {
    fn write_bytes(&mut self, bytes: &[u8]) -> fmt::Result {
        write!(self, "{}", bytes.as_bstr())
    }
}

enum Open<'a> {
    Array(slice::Iter<'a, Value>),
    Object(map::Iter<'a>),
}

struct Level<'a> {
    open: Open<'a>,
    first: bool,
}

fn write_value<S: Sink + ?Sized>(root: &Value, out: &mut S) -> fmt::Result {
    let mut stack: Vec<Level<'_>> = Vec::new();
    let mut next = Some(root);
    loop {
        if let Some(value) = next.take() {
            match value {
                Value::Array(seq) => {
                    out.write_str("[")?;
                    stack.push(Level {
                        open: Open::Array(seq.iter()),
                        first: true,
                    });
                }
                Value::Object(map) => {
                    out.write_str("{")?;
                    stack.push(Level {
                        open: Open::Object(map.iter()),
                        first: true,
                    });
                }
                scalar => write_scalar(scalar, out)?,
            }
        }

        let Some(level) = stack.last_mut() else {
            return Ok(());
        };
        let separator = if level.first { "" } else { "," };
        let closed = match &mut level.open {
            Open::Array(items) => match items.next() {
                Some(item) => {
                    out.write_str(separator)?;
                    next = Some(item);
                    false
                }
                None => {
                    out.write_str("]")?;
                    true
                }
            },
            Open::Object(entries) => match entries.next() {
                Some((key, item)) => {
                    out.write_str(separator)?;
                    write_string(key, out)?;
                    out.write_str(":")?;
                    next = Some(item);
                    false
                }
                None => {
                    out.write_str("}")?;
                    true
                }
            },
        };
        level.first = false;
        if closed {
            stack.pop();
        }
    }
}

fn write_scalar<S: Sink + ?Sized>(value: &Value, out: &mut S) -> fmt::Result {
    match value {
        Value::Boolean(true) => out.write_str("true"),
        Value::Boolean(false) => out.write_str("false"),
        Value::Number(n) => write_number(*n, out),
        Value::String(s) => write_string(s, out),
        // Containers are handled by the caller.
        Value::None | Value::Null | Value::Array(_) | Value::Object(_) => out.write_str("null"),
    }
}

fn write_number<S: Sink + ?Sized>(n: f64, out: &mut S) -> fmt::Result {
    if !n.is_finite() {
        return out.write_str("null");
    }
    let abs = n.abs();
    if abs == 0.0 || (1e-5..1e16).contains(&abs) {
        write!(out, "{n}")
    } else {
        write!(out, "{n:e}")
    }
}

fn escape(byte: u8) -> Option<&'static str> {
    Some(match byte {
        b'"' => "\\\"",
        b'\\' => "\\\\",
        b'/' => "\\/",
        0x08 => "\\b",
        0x0C => "\\f",
        b'\n' => "\\n",
        b'\r' => "\\r",
        b'\t' => "\\t",
        _ => return None,
    })
}

fn write_string<S: Sink + ?Sized>(bytes: &[u8], out: &mut S) -> fmt::Result {
    out.write_str("\"")?;
    let mut run = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if let Some(esc) = escape(b) {
            out.write_bytes(&bytes[run..i])?;
            out.write_str(esc)?;
            run = i + 1;
        }
    }
    out.write_bytes(&bytes[run..])?;
    out.write_str("\"")
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::{OrderedMap, Sequence};

    fn json(v: &Value) -> Vec<u8> {
        v.to_json_vec().unwrap()
    }

    #[test]
    fn scalars() {
        assert_eq!(json(&Value::Null), b"null");
        assert_eq!(json(&Value::None), b"null");
        assert_eq!(json(&Value::from(true)), b"true");
        assert_eq!(json(&Value::from(false)), b"false");
        assert_eq!(json(&Value::from("")), b"\"\"");
    }

    #[test]
    fn numbers_use_shortest_form() {
        let cases = [
            (0.0, "0"),
            (-0.0, "-0"),
            (1.0, "1"),
            (-2.5, "-2.5"),
            (0.1, "0.1"),
            (1e-5, "0.00001"),
            (1e-7, "1e-7"),
            (123_456_789_012_345.0, "123456789012345"),
            (1e16, "1e16"),
            (1.5e300, "1.5e300"),
            (f64::NAN, "null"),
            (f64::INFINITY, "null"),
        ];
        for (n, expected) in cases {
            assert_eq!(Value::from(n).to_string(), expected, "{n}");
        }
    }

    #[test]
    fn escapes_the_short_set() {
        let v = Value::from(&b"q\"b\\s/\x08\x0C\n\r\tz"[..]);
        assert_eq!(json(&v), br#""q\"b\\s\/\b\f\n\r\tz""#);
    }

    #[test]
    fn other_bytes_are_written_raw() {
        let v = Value::from(&b"\x01\xFF\xC3\xA9"[..]);
        assert_eq!(json(&v), b"\"\x01\xFF\xC3\xA9\"");
        assert_eq!(v.to_string(), "\"\u{1}\u{FFFD}\u{e9}\"");
    }

    #[test]
    fn containers_keep_order() {
        let mut inner = Sequence::new();
        inner.push(Value::from(1)).unwrap();
        inner.push(Value::Array(Sequence::new())).unwrap();
        inner.push(Value::Object(OrderedMap::new())).unwrap();
        let mut map = OrderedMap::new();
        map.set("z", Value::Array(inner)).unwrap();
        map.set("a", Value::Null).unwrap();
        assert_eq!(
            Value::Object(map).to_string(),
            r#"{"z":[1,[],{}],"a":null}"#
        );
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let depth = 10_000;
        let mut v = Value::from(0);
        for _ in 0..depth {
            let mut seq = Sequence::new();
            seq.push(v).unwrap();
            v = Value::Array(seq);
        }
        let expected = "[".repeat(depth) + "0" + &"]".repeat(depth);
        assert_eq!(json(&v), expected.as_bytes());
    }
}
