//! Encode Rust values as JSON text.

use std::io;

use tracing::trace;

use crate::{
    bind::Bind,
    config::SerializeCfg,
    datum::Datum,
    error::{Error, ErrorCode, Result},
    format::{CompactFormatter, Container, Formatter, PrettyFormatter},
    value::Value,
};

/// `yyyy-MM-ddTHH:mm:ss.nnnnnnnnn+HH:MM`, with a numeric offset even for UTC.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9f%:z";

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// A structure for encoding Rust values into JSON.
///
/// Strings are written between quotes exactly as they are: quotes and
/// backslashes inside them are not escaped. The parser reads `\"` as an
/// escaped quote, so a string containing `"` or ending in `\` cannot be
/// decoded again from the output.
pub struct Encoder<W, F = CompactFormatter> {
    writer: W,
    formatter: F,
    cfg: SerializeCfg,
}

impl<W> Encoder<W>
where
    W: io::Write,
{
    /// Creates a new JSON encoder.
    #[inline]
    pub fn new(writer: W) -> Self {
        Encoder::with_formatter(writer, CompactFormatter)
    }
}

impl<W> Encoder<W, PrettyFormatter>
where
    W: io::Write,
{
    /// Creates a new JSON pretty print encoder.
    #[inline]
    pub fn pretty(writer: W) -> Self {
        Encoder::with_formatter(writer, PrettyFormatter::new())
    }
}

impl<W, F> Encoder<W, F>
where
    W: io::Write,
    F: Formatter,
{
    /// Creates a new JSON visitor whose output will be written to the writer
    /// specified.
    #[inline]
    pub fn with_formatter(writer: W, formatter: F) -> Self {
        Encoder {
            writer,
            formatter,
            cfg: SerializeCfg::default(),
        }
    }

    /// Write map keys that are numbers, booleans or `null` without quotes,
    /// e.g. `{1:"a"}`.
    ///
    /// The output is then not valid JSON. It matches what older producers
    /// of this format emit, and [`crate::parse`] reads it back.
    pub fn raw_map_keys(mut self) -> Self {
        self.cfg.raw_map_keys = true;
        self
    }

    /// Unwrap the `Writer` from the `Encoder`.
    #[inline]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Encodes `value` and writes it out.
    pub fn encode<T: Bind>(&mut self, value: &T) -> Result<()> {
        trace!(ty = ?T::field_type(), "encoding value");
        let datum = value.to_datum()?;
        self.write_datum(&datum)
    }

    /// Writes an untyped [`Value`].
    pub fn encode_value(&mut self, value: &Value) -> Result<()> {
        self.write_value(value)
    }

    fn write_datum(&mut self, datum: &Datum) -> Result<()> {
        let (fmt, out) = (&mut self.formatter, &mut self.writer);
        match datum {
            Datum::Null => fmt.write_bare(out, "null")?,
            Datum::Boolean(b) => fmt.write_bare(out, if *b { "true" } else { "false" })?,
            Datum::Number(n) => fmt.write_bare(out, n.as_str())?,
            Datum::String(s) => fmt.write_quoted(out, s)?,
            Datum::Enumeration(name) => fmt.write_quoted(out, name)?,
            Datum::Uuid(id) => {
                let mut buf = uuid::Uuid::encode_buffer();
                fmt.write_quoted(out, id.hyphenated().encode_lower(&mut buf))?
            }
            Datum::Date(date) => {
                fmt.write_quoted(out, &date.format(DATE_FORMAT).to_string())?
            }
            Datum::Timestamp(ts) => {
                fmt.write_quoted(out, &ts.format(TIMESTAMP_FORMAT).to_string())?
            }
            Datum::Sequence(items) => {
                self.formatter.open(&mut self.writer, Container::Array)?;
                for (i, item) in items.iter().enumerate() {
                    self.formatter.separate(&mut self.writer, i == 0)?;
                    self.write_datum(item)?;
                }
                self.formatter
                    .close(&mut self.writer, Container::Array, items.is_empty())?
            }
            Datum::Mapping(entries) => {
                self.formatter.open(&mut self.writer, Container::Object)?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    self.formatter.separate(&mut self.writer, i == 0)?;
                    self.write_key(key)?;
                    self.formatter.colon(&mut self.writer)?;
                    self.write_datum(value)?;
                }
                self.formatter
                    .close(&mut self.writer, Container::Object, entries.is_empty())?
            }
            Datum::Record(record) => {
                self.formatter.open(&mut self.writer, Container::Object)?;
                let mut first = true;
                for (field, value) in record.iter() {
                    if field.is_transient() {
                        continue;
                    }
                    self.formatter.separate(&mut self.writer, first)?;
                    self.formatter.write_quoted(&mut self.writer, field.name)?;
                    self.formatter.colon(&mut self.writer)?;
                    match value {
                        Some(value) => self.write_datum(value)?,
                        None => self.formatter.write_bare(&mut self.writer, "null")?,
                    }
                    first = false;
                }
                self.formatter
                    .close(&mut self.writer, Container::Object, first)?
            }
        }
        Ok(())
    }

    /// Keys that are numbers, booleans or `null` are quoted unless
    /// `raw_map_keys` is set.
    fn write_key(&mut self, key: &Datum) -> Result<()> {
        let bare = match key {
            Datum::Null => "null",
            Datum::Boolean(true) => "true",
            Datum::Boolean(false) => "false",
            Datum::Number(n) => n.as_str(),
            Datum::String(_)
            | Datum::Uuid(_)
            | Datum::Date(_)
            | Datum::Timestamp(_)
            | Datum::Enumeration(_) => return self.write_datum(key),
            Datum::Sequence(_) | Datum::Mapping(_) | Datum::Record(_) => {
                return Err(Error::new(ErrorCode::KeyMustBeAScalar(key.kind())));
            }
        };
        if self.cfg.raw_map_keys {
            self.formatter.write_bare(&mut self.writer, bare)?;
        } else {
            self.formatter.write_quoted(&mut self.writer, bare)?;
        }
        Ok(())
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.formatter.write_bare(&mut self.writer, "null")?,
            Value::Bool(b) => self
                .formatter
                .write_bare(&mut self.writer, if *b { "true" } else { "false" })?,
            Value::Number(n) => self.formatter.write_bare(&mut self.writer, n.as_str())?,
            Value::String(s) => self.formatter.write_quoted(&mut self.writer, s)?,
            Value::Array(items) => {
                self.formatter.open(&mut self.writer, Container::Array)?;
                for (i, item) in items.iter().enumerate() {
                    self.formatter.separate(&mut self.writer, i == 0)?;
                    self.write_value(item)?;
                }
                self.formatter
                    .close(&mut self.writer, Container::Array, items.is_empty())?
            }
            Value::Object(object) => {
                self.formatter.open(&mut self.writer, Container::Object)?;
                for (i, (key, value)) in object.iter().enumerate() {
                    self.formatter.separate(&mut self.writer, i == 0)?;
                    self.formatter.write_quoted(&mut self.writer, key)?;
                    self.formatter.colon(&mut self.writer)?;
                    self.write_value(value)?;
                }
                self.formatter
                    .close(&mut self.writer, Container::Object, object.is_empty())?
            }
        }
        Ok(())
    }
}

/// Encode the given value as JSON into the I/O stream.
///
/// Encoding fails for non-finite floats and for maps keyed by containers.
#[inline]
pub fn encode_to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: Bind,
{
    let mut enc = Encoder::new(writer);
    enc.encode(value)
}

/// Encode the given value as a JSON byte vector.
#[inline]
pub fn encode_to_vec<T: Bind>(value: &T) -> Result<Vec<u8>> {
    let mut writer = Vec::with_capacity(128);
    encode_to_writer(&mut writer, value)?;
    Ok(writer)
}

/// Encode the given value as a String of JSON.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use jsonbind::encode;
///
/// let stock = BTreeMap::from([(1u32, 6u64), (2, 0)]);
/// assert_eq!(encode(&stock).unwrap(), r#"{"1":6,"2":0}"#);
/// assert_eq!(encode(&None::<u8>).unwrap(), "null");
/// assert!(encode(&f64::NAN).unwrap_err().is_encode());
/// ```
#[inline]
pub fn encode<T: Bind>(value: &T) -> Result<String> {
    let vec = encode_to_vec(value)?;
    let string = unsafe {
        // We do not emit invalid UTF-8.
        String::from_utf8_unchecked(vec)
    };
    Ok(string)
}

/// Encode the given value as a pretty-printed String of JSON, indented by
/// two spaces.
#[inline]
pub fn encode_pretty<T: Bind>(value: &T) -> Result<String> {
    let mut enc = Encoder::pretty(Vec::with_capacity(128));
    enc.encode(value)?;
    let string = unsafe {
        // We do not emit invalid UTF-8.
        String::from_utf8_unchecked(enc.into_inner())
    };
    Ok(string)
}

/// Compact JSON text of an untyped value.
pub(crate) fn to_string_value(value: &Value) -> String {
    let mut enc = Encoder::new(Vec::with_capacity(64));
    if let Err(err) = enc.write_value(value) {
        // object keys are strings and a `Vec` sink never fails
        unreachable!("encoding an untyped value failed: {err}");
    }
    unsafe { String::from_utf8_unchecked(enc.into_inner()) }
}
