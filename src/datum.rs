//! The schema-typed tree that sits between Rust values and JSON text.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use faststr::FastStr;
use uuid::Uuid;

use crate::{
    bind::Bind,
    error::{make_error, Error, Result},
    schema::{Field, Schema},
    Number,
};

/// A value that already knows its declared type.
///
/// Encoding turns a Rust value into a `Datum` with [`Bind::to_datum`] and
/// then writes it out; decoding converts a parsed [`Value`](crate::Value)
/// into a `Datum` following a [`FieldType`](crate::FieldType) and hands it to
/// [`Bind::from_datum`].
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Boolean(bool),
    Number(Number),
    String(FastStr),
    Uuid(Uuid),
    Date(NaiveDate),
    Timestamp(DateTime<FixedOffset>),
    Enumeration(&'static str),
    Sequence(Vec<Datum>),
    /// Entries in iteration order of the source map.
    Mapping(Vec<(Datum, Datum)>),
    Record(RecordDatum),
}

impl Datum {
    /// A short human readable name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Boolean(_) => "boolean",
            Datum::Number(_) => "number",
            Datum::String(_) => "string",
            Datum::Uuid(_) => "uuid",
            Datum::Date(_) => "date",
            Datum::Timestamp(_) => "timestamp",
            Datum::Enumeration(_) => "enumeration",
            Datum::Sequence(_) => "sequence",
            Datum::Mapping(_) => "mapping",
            Datum::Record(record) => record.schema.name,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    #[doc(hidden)]
    #[cold]
    pub fn mismatch(&self, expected: &'static str) -> Error {
        Error::invalid_type(self.kind(), expected)
    }

    /// Unwraps a record of the given schema.
    pub fn into_record(self, schema: &'static Schema) -> Result<RecordDatum> {
        match self {
            Datum::Record(record) if std::ptr::eq(record.schema, schema) => Ok(record),
            other => Err(other.mismatch(schema.name)),
        }
    }
}

/// The fields of one record, index-aligned with its [`Schema`].
#[derive(Clone)]
pub struct RecordDatum {
    schema: &'static Schema,
    values: Vec<Option<Datum>>,
}

impl RecordDatum {
    /// A record with every field absent.
    pub fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            values: vec![None; schema.fields.len()],
        }
    }

    #[inline]
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub(crate) fn set(&mut self, idx: usize, datum: Datum) {
        self.values[idx] = Some(datum);
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.schema.position(name).ok_or_else(|| {
            make_error(format!(
                "record `{}` has no field `{}`",
                self.schema.name, name
            ))
        })
    }

    /// Stores the datum of `value` as field `name`.
    pub fn put<T: Bind>(&mut self, name: &str, value: &T) -> Result<()> {
        let idx = self.position(name)?;
        let datum = value
            .to_datum()
            .map_err(|e| e.in_field(self.schema.name, name))?;
        self.set(idx, datum);
        Ok(())
    }

    /// Removes field `name` and converts it into `T`. An absent or `null`
    /// field yields `T::default()`.
    pub fn take<T: Bind + Default>(&mut self, name: &str) -> Result<T> {
        let idx = self.position(name)?;
        match self.values[idx].take() {
            None | Some(Datum::Null) => Ok(T::default()),
            Some(datum) => T::from_datum(datum).map_err(|e| e.in_field(self.schema.name, name)),
        }
    }

    /// Fields in declaration order together with their datum, `None` when
    /// the field is absent or transient.
    pub fn iter(&self) -> impl Iterator<Item = (&'static Field, Option<&Datum>)> + '_ {
        self.schema
            .fields
            .iter()
            .zip(self.values.iter().map(Option::as_ref))
    }
}

impl PartialEq for RecordDatum {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.values == other.values
    }
}

impl fmt::Debug for RecordDatum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema.name);
        for (field, datum) in self.iter() {
            if let Some(datum) = datum {
                s.field(field.name, datum);
            }
        }
        s.finish()
    }
}
