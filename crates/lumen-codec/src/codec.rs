//! Primitive encode/decode for both field-file encodings.
//!
//! Binary integers are little-endian `i64`; binary values are little-endian
//! `f32` or `f64`. ASCII files put one number per line on write and accept
//! any whitespace layout on read.

use std::io::{self, BufRead, Read, Write};

use crate::error::CodecError;
use crate::layout::{Encoding, HeaderInts, Precision};

// ── Binary primitives ───────────────────────────────────────────

/// Write a little-endian i64.
pub fn write_i64_le(w: &mut dyn Write, v: i64) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Read a little-endian i64.
pub fn read_i64_le(r: &mut dyn Read) -> Result<i64, CodecError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(i64::from_le_bytes(buf))
}

/// Write values at the given precision, little-endian.
pub fn write_values_le(
    w: &mut dyn Write,
    values: &[f64],
    precision: Precision,
) -> Result<(), CodecError> {
    let mut buf = Vec::with_capacity(values.len() * precision.bytes() as usize);
    match precision {
        Precision::Single => {
            for &v in values {
                buf.extend_from_slice(&(v as f32).to_le_bytes());
            }
        }
        Precision::Double => {
            for &v in values {
                buf.extend_from_slice(&v.to_le_bytes());
            }
        }
    }
    w.write_all(&buf)?;
    Ok(())
}

/// Read `count` little-endian values at the given precision.
pub fn read_values_le(
    r: &mut dyn Read,
    count: usize,
    precision: Precision,
) -> Result<Vec<f64>, CodecError> {
    let width = precision.bytes();
    let len = (count as u64)
        .checked_mul(width)
        .ok_or_else(|| CodecError::MalformedHeader {
            detail: format!("{count} values of {width} bytes overflows the file size"),
        })?;
    // Grows with the bytes actually present, so a bogus count cannot
    // reserve more than the source holds.
    let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC as u64 * 8) as usize);
    r.take(len).read_to_end(&mut buf)?;
    if (buf.len() as u64) < len {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    let values = match precision {
        Precision::Single => buf
            .chunks_exact(4)
            .map(|c| f64::from(f32::from_le_bytes([c[0], c[1], c[2], c[3]])))
            .collect(),
        Precision::Double => buf
            .chunks_exact(8)
            .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect(),
    };
    Ok(values)
}

// ── ASCII primitives ────────────────────────────────────────────

/// Upper bound on values reserved ahead of parsing a text body.
pub const MAX_PREALLOC: usize = 1 << 16;

/// Format a value the way ASCII field files store it.
///
/// Rust's shortest round-trip exponent form, so ASCII files are lossless
/// for `f64`.
pub fn format_value(v: f64) -> String {
    format!("{v:e}")
}

/// Parse an integer token.
pub fn parse_int(token: &str) -> Result<i64, CodecError> {
    token.parse().map_err(|_| CodecError::Parse {
        token: token.to_string(),
    })
}

/// Parse a floating-point token, accepting Fortran `D` exponents.
pub fn parse_value(token: &str) -> Result<f64, CodecError> {
    if let Ok(v) = token.parse() {
        return Ok(v);
    }
    token
        .replace(['D', 'd'], "e")
        .parse()
        .map_err(|_| CodecError::Parse {
            token: token.to_string(),
        })
}

/// Whitespace-separated tokens over a buffered reader.
pub struct AsciiTokens<R> {
    reader: R,
    line: String,
    pos: usize,
}

impl<R: BufRead> AsciiTokens<R> {
    /// Tokenize `reader` from its current position.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pos: 0,
        }
    }

    fn find_token(&self) -> Option<(usize, usize)> {
        let rest = &self.line[self.pos..];
        let start = self.pos + rest.find(|c: char| !c.is_whitespace())?;
        let end = self.line[start..]
            .find(char::is_whitespace)
            .map_or(self.line.len(), |e| start + e);
        Some((start, end))
    }

    /// Apply `f` to the next token, or return `None` at end of input.
    pub fn next_with<T>(&mut self, f: impl FnOnce(&str) -> T) -> Result<Option<T>, CodecError> {
        loop {
            if let Some((start, end)) = self.find_token() {
                self.pos = end;
                return Ok(Some(f(&self.line[start..end])));
            }
            self.line.clear();
            self.pos = 0;
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
        }
    }

    /// Next integer token; end of input is an error.
    pub fn next_int(&mut self) -> Result<i64, CodecError> {
        self.next_with(parse_int)?.unwrap_or_else(|| {
            Err(CodecError::MalformedHeader {
                detail: "unexpected end of file in header".into(),
            })
        })
    }

    /// Read exactly `count` values.
    ///
    /// `count` usually comes from a file header, so only a bounded amount
    /// is reserved up front.
    pub fn next_values(&mut self, count: usize) -> Result<Vec<f64>, CodecError> {
        let mut out = Vec::with_capacity(count.min(MAX_PREALLOC));
        while out.len() < count {
            match self.next_with(parse_value)? {
                Some(v) => out.push(v?),
                None => {
                    return Err(CodecError::BodyLengthMismatch {
                        expected: count as u64,
                        found: out.len() as u64,
                        unit: "values",
                    })
                }
            }
        }
        Ok(out)
    }

    /// Count the tokens left in the input.
    pub fn count_remaining(&mut self) -> Result<u64, CodecError> {
        let mut n = 0;
        while self.next_with(|_| ())?.is_some() {
            n += 1;
        }
        Ok(n)
    }

    /// The wrapped reader. Any partially consumed line is discarded.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

// ── Encoding-dispatching encoder/decoder ────────────────────────

/// Writes header integers and values in either encoding.
pub struct Encoder<W> {
    sink: W,
    encoding: Encoding,
    precision: Precision,
}

impl<W: Write> Encoder<W> {
    /// Wrap a sink.
    pub fn new(sink: W, encoding: Encoding, precision: Precision) -> Self {
        Self {
            sink,
            encoding,
            precision,
        }
    }

    /// Write header integers.
    pub fn write_ints(&mut self, ints: &[i64]) -> Result<(), CodecError> {
        match self.encoding {
            Encoding::Binary => {
                for &i in ints {
                    write_i64_le(&mut self.sink, i)?;
                }
            }
            Encoding::Ascii => {
                for &i in ints {
                    writeln!(self.sink, "{i}")?;
                }
            }
        }
        Ok(())
    }

    /// Write values.
    pub fn write_values(&mut self, values: &[f64]) -> Result<(), CodecError> {
        match self.encoding {
            Encoding::Binary => write_values_le(&mut self.sink, values, self.precision),
            Encoding::Ascii => {
                for &v in values {
                    writeln!(self.sink, "{}", format_value(v))?;
                }
                Ok(())
            }
        }
    }

    /// The wrapped sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Flush the wrapped sink.
    pub fn flush(&mut self) -> Result<(), CodecError> {
        self.sink.flush()?;
        Ok(())
    }

    /// Consume and return the wrapped sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Reads header integers and values in either encoding.
pub enum Decoder<R> {
    /// Token stream over text.
    Ascii(AsciiTokens<R>),
    /// Raw bytes.
    Binary(R),
}

impl<R: BufRead> Decoder<R> {
    /// Wrap a source.
    pub fn new(source: R, encoding: Encoding) -> Self {
        match encoding {
            Encoding::Ascii => Self::Ascii(AsciiTokens::new(source)),
            Encoding::Binary => Self::Binary(source),
        }
    }

    /// The encoding being decoded.
    pub fn encoding(&self) -> Encoding {
        match self {
            Self::Ascii(_) => Encoding::Ascii,
            Self::Binary(_) => Encoding::Binary,
        }
    }

    /// Read one header integer.
    pub fn read_int(&mut self) -> Result<i64, CodecError> {
        match self {
            Self::Ascii(t) => t.next_int(),
            Self::Binary(r) => read_i64_le(r),
        }
    }

    /// Read `count` header integers.
    pub fn read_ints(&mut self, count: usize) -> Result<HeaderInts, CodecError> {
        (0..count).map(|_| self.read_int()).collect()
    }

    /// Read `count` values; `precision` is ignored for ASCII.
    pub fn read_values(
        &mut self,
        count: usize,
        precision: Precision,
    ) -> Result<Vec<f64>, CodecError> {
        match self {
            Self::Ascii(t) => t.next_values(count),
            Self::Binary(r) => read_values_le(r, count, precision),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_span_lines_and_blanks() {
        let text = "1\n\n  2   3\n4.5e0 \t -1D2\n";
        let mut t = AsciiTokens::new(text.as_bytes());
        assert_eq!(t.next_int().unwrap(), 1);
        assert_eq!(t.next_int().unwrap(), 2);
        assert_eq!(t.next_int().unwrap(), 3);
        assert_eq!(t.next_values(2).unwrap(), vec![4.5, -100.0]);
        assert_eq!(t.count_remaining().unwrap(), 0);
    }

    #[test]
    fn short_ascii_body_reports_counts() {
        let mut t = AsciiTokens::new("1.0 2.0".as_bytes());
        match t.next_values(3) {
            Err(CodecError::BodyLengthMismatch { expected, found, .. }) => {
                assert_eq!((expected, found), (3, 2));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn huge_counts_fail_on_the_data_not_the_allocator() {
        let mut t = AsciiTokens::new("1.0".as_bytes());
        assert!(matches!(
            t.next_values(usize::MAX / 2),
            Err(CodecError::BodyLengthMismatch { found: 1, .. })
        ));
        let bytes = 1.0f64.to_le_bytes();
        assert!(matches!(
            read_values_le(&mut bytes.as_slice(), 1 << 58, Precision::Double),
            Err(CodecError::Io(_))
        ));
        assert!(matches!(
            read_values_le(&mut bytes.as_slice(), usize::MAX, Precision::Double),
            Err(CodecError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn garbage_token_is_parse_error() {
        let mut t = AsciiTokens::new("1 abc".as_bytes());
        t.next_int().unwrap();
        assert!(matches!(t.next_int(), Err(CodecError::Parse { .. })));
    }

    #[test]
    fn binary_values_roundtrip_single() {
        let mut buf = Vec::new();
        write_values_le(&mut buf, &[1.5, -2.25], Precision::Single).unwrap();
        assert_eq!(buf.len(), 8);
        let back = read_values_le(&mut buf.as_slice(), 2, Precision::Single).unwrap();
        assert_eq!(back, vec![1.5, -2.25]);
    }

    #[test]
    fn ascii_values_are_lossless() {
        let v = 1.0e-18_f64 / 3.0;
        assert_eq!(parse_value(&format_value(v)).unwrap(), v);
    }

    #[test]
    fn encoder_ascii_one_per_line() {
        let mut enc = Encoder::new(Vec::new(), Encoding::Ascii, Precision::Double);
        enc.write_ints(&[1, 2]).unwrap();
        enc.write_values(&[0.5]).unwrap();
        assert_eq!(String::from_utf8(enc.into_inner()).unwrap(), "1\n2\n5e-1\n");
    }

    #[test]
    fn decoder_binary_ints() {
        let mut buf = Vec::new();
        for i in [1i64, 8, -3] {
            write_i64_le(&mut buf, i).unwrap();
        }
        let mut dec = Decoder::new(buf.as_slice(), Encoding::Binary);
        assert_eq!(dec.read_ints(3).unwrap().as_slice(), &[1, 8, -3]);
        assert!(dec.read_int().is_err());
    }
}
