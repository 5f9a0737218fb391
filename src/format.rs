//! Layout of the encoded text.
//!
//! The [`Encoder`](crate::Encoder) decides *what* is written and hands every
//! token to a [`Formatter`], which decides the whitespace around it.

use std::io::{self, Write};

/// The two bracketed shapes of JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Array,
    Object,
}

impl Container {
    fn open(self) -> &'static [u8] {
        match self {
            Container::Array => b"[",
            Container::Object => b"{",
        }
    }

    fn close(self) -> &'static [u8] {
        match self {
            Container::Array => b"]",
            Container::Object => b"}",
        }
    }
}

/// Token sink used by the encoder.
///
/// Only the structural hooks carry layout; the default bodies produce the
/// compact form.
pub trait Formatter {
    /// Writes an unquoted token: `null`, `true`, `false` or a number.
    #[inline]
    fn write_bare<W>(&mut self, writer: &mut W, text: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(text.as_bytes())
    }

    /// Writes `text` between double quotes, byte for byte. Nothing inside is
    /// escaped, so a `"` or a trailing `\` in `text` yields output that does
    /// not read back as the same string.
    #[inline]
    fn write_quoted<W>(&mut self, writer: &mut W, text: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b"\"")?;
        writer.write_all(text.as_bytes())?;
        writer.write_all(b"\"")
    }

    #[inline]
    fn open<W>(&mut self, writer: &mut W, container: Container) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(container.open())
    }

    /// Called before each element of an array and each key of an object.
    #[inline]
    fn separate<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b",")
        }
    }

    /// Called between an object key and its value.
    #[inline]
    fn colon<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b":")
    }

    /// `empty` is true when nothing was written since the matching `open`.
    #[inline]
    fn close<W>(&mut self, writer: &mut W, container: Container, _empty: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(container.close())
    }
}

/// No whitespace at all: `{"a":[1,2]}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompactFormatter;

impl Formatter for CompactFormatter {}

/// One element or entry per line, nested levels indented by `width` spaces.
/// Empty containers stay on one line as `[]` and `{}`.
#[derive(Clone, Debug)]
pub struct PrettyFormatter {
    depth: usize,
    width: usize,
}

impl PrettyFormatter {
    pub fn new() -> Self {
        PrettyFormatter::with_width(2)
    }

    pub fn with_width(width: usize) -> Self {
        PrettyFormatter { depth: 0, width }
    }

    fn newline<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        write!(writer, "\n{:1$}", "", self.depth * self.width)
    }
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        PrettyFormatter::new()
    }
}

impl Formatter for PrettyFormatter {
    fn open<W>(&mut self, writer: &mut W, container: Container) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.depth += 1;
        writer.write_all(container.open())
    }

    fn separate<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if !first {
            writer.write_all(b",")?;
        }
        self.newline(writer)
    }

    fn colon<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn close<W>(&mut self, writer: &mut W, container: Container, empty: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.depth = self.depth.saturating_sub(1);
        if !empty {
            self.newline(writer)?;
        }
        writer.write_all(container.close())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn write_pair<F: Formatter>(fmt: &mut F) -> Vec<u8> {
        let mut out = Vec::new();
        fmt.open(&mut out, Container::Object).unwrap();
        fmt.separate(&mut out, true).unwrap();
        fmt.write_quoted(&mut out, "k").unwrap();
        fmt.colon(&mut out).unwrap();
        fmt.open(&mut out, Container::Array).unwrap();
        fmt.close(&mut out, Container::Array, true).unwrap();
        fmt.separate(&mut out, false).unwrap();
        fmt.write_bare(&mut out, "1").unwrap();
        fmt.colon(&mut out).unwrap();
        fmt.write_bare(&mut out, "null").unwrap();
        fmt.close(&mut out, Container::Object, false).unwrap();
        out
    }

    #[test]
    fn test_compact_layout() {
        assert_eq!(write_pair(&mut CompactFormatter), br#"{"k":[],1:null}"#);
    }

    #[test]
    fn test_pretty_layout() {
        let out = write_pair(&mut PrettyFormatter::with_width(4));
        assert_eq!(out, b"{\n    \"k\": [],\n    1: null\n}");
    }

    #[test]
    fn test_quoted_is_verbatim() {
        let mut out = Vec::new();
        CompactFormatter.write_quoted(&mut out, r"C:\").unwrap();
        assert_eq!(out, br#""C:\""#);
    }
}
