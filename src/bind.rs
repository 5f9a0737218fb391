//! Conversions between Rust types and [`Datum`].

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    hash::{BuildHasher, Hash},
};

use chrono::{DateTime, FixedOffset, NaiveDate};
use faststr::FastStr;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    datum::Datum,
    error::{Error, ErrorCode, Result},
    schema::FieldType,
    Number,
};

/// A Rust type that the codec can write and read back.
///
/// `field_type` is the declared type the decoder converts parsed JSON into;
/// `to_datum` and `from_datum` move between `Self` and that shape.
/// Implementations for records and enumerations are generated by
/// [`record!`](crate::record) and [`enumeration!`](crate::enumeration).
pub trait Bind: Sized {
    fn field_type() -> FieldType;

    fn to_datum(&self) -> Result<Datum>;

    fn from_datum(datum: Datum) -> Result<Self>;
}

impl Bind for bool {
    fn field_type() -> FieldType {
        FieldType::Boolean
    }

    fn to_datum(&self) -> Result<Datum> {
        Ok(Datum::Boolean(*self))
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Boolean(b) => Ok(b),
            other => Err(other.mismatch("boolean")),
        }
    }
}

macro_rules! impl_bind_integer {
    ($($ty:ident),*) => {
        $(
            impl Bind for $ty {
                fn field_type() -> FieldType {
                    FieldType::Integer
                }

                fn to_datum(&self) -> Result<Datum> {
                    Ok(Datum::Number(Number::from(*self)))
                }

                fn from_datum(datum: Datum) -> Result<Self> {
                    match datum {
                        Datum::Number(n) => n.as_integer(),
                        other => Err(other.mismatch("integer")),
                    }
                }
            }
        )*
    };
}

impl_bind_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

macro_rules! impl_bind_float {
    ($($ty:ident => $from:ident),*) => {
        $(
            impl Bind for $ty {
                fn field_type() -> FieldType {
                    FieldType::Float
                }

                fn to_datum(&self) -> Result<Datum> {
                    Number::$from(*self)
                        .map(Datum::Number)
                        .ok_or_else(|| Error::new(ErrorCode::NonFiniteFloat))
                }

                fn from_datum(datum: Datum) -> Result<Self> {
                    let n = match datum {
                        Datum::Number(n) => n,
                        other => return Err(other.mismatch("float")),
                    };
                    match n.as_str().parse::<$ty>() {
                        Ok(f) if f.is_finite() => Ok(f),
                        Ok(_) => Err(Error::new(ErrorCode::NumberOutOfRange(n.as_str().into()))),
                        Err(_) => Err(Error::invalid_scalar("float", n.as_str())),
                    }
                }
            }
        )*
    };
}

impl_bind_float!(f32 => from_f32, f64 => from_f64);

/// Bounded by `rust_decimal`: 28 significant digits and a scale of at most
/// 28. Values beyond that, such as `1e-100`, fail with a data error; bind
/// the field as [`Number`] to keep any decimal exactly.
impl Bind for Decimal {
    fn field_type() -> FieldType {
        FieldType::Decimal
    }

    fn to_datum(&self) -> Result<Datum> {
        Ok(Datum::Number(Number::from(*self)))
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Number(n) => n
                .as_decimal()
                .ok_or_else(|| Error::new(ErrorCode::NumberOutOfRange(n.as_str().into()))),
            other => Err(other.mismatch("decimal")),
        }
    }
}

/// A `Number` keeps any precision, so it binds as a decimal without the
/// range limits of `rust_decimal`.
impl Bind for Number {
    fn field_type() -> FieldType {
        FieldType::Decimal
    }

    fn to_datum(&self) -> Result<Datum> {
        Ok(Datum::Number(self.clone()))
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Number(n) => Ok(n),
            other => Err(other.mismatch("decimal")),
        }
    }
}

impl Bind for String {
    fn field_type() -> FieldType {
        FieldType::String
    }

    fn to_datum(&self) -> Result<Datum> {
        Ok(Datum::String(FastStr::new(self)))
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::String(s) => Ok(s.as_str().to_owned()),
            other => Err(other.mismatch("string")),
        }
    }
}

impl Bind for FastStr {
    fn field_type() -> FieldType {
        FieldType::String
    }

    fn to_datum(&self) -> Result<Datum> {
        Ok(Datum::String(self.clone()))
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::String(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }
}

impl Bind for Uuid {
    fn field_type() -> FieldType {
        FieldType::Uuid
    }

    fn to_datum(&self) -> Result<Datum> {
        Ok(Datum::Uuid(*self))
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Uuid(id) => Ok(id),
            other => Err(other.mismatch("uuid")),
        }
    }
}

impl Bind for NaiveDate {
    fn field_type() -> FieldType {
        FieldType::Date
    }

    fn to_datum(&self) -> Result<Datum> {
        Ok(Datum::Date(*self))
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Date(date) => Ok(date),
            other => Err(other.mismatch("date")),
        }
    }
}

impl Bind for DateTime<FixedOffset> {
    fn field_type() -> FieldType {
        FieldType::Timestamp
    }

    fn to_datum(&self) -> Result<Datum> {
        Ok(Datum::Timestamp(*self))
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Timestamp(ts) => Ok(ts),
            other => Err(other.mismatch("timestamp")),
        }
    }
}

/// `None` is written as `null`, and `null` reads back as `None`.
impl<T: Bind> Bind for Option<T> {
    fn field_type() -> FieldType {
        T::field_type()
    }

    fn to_datum(&self) -> Result<Datum> {
        match self {
            Some(value) => value.to_datum(),
            None => Ok(Datum::Null),
        }
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Null => Ok(None),
            datum => T::from_datum(datum).map(Some),
        }
    }
}

// Sequences and mappings read `null` as empty.
macro_rules! impl_bind_sequence {
    ($($ty:ident<T $(: $bound:ident $(+ $rest:ident)*)?>),*) => {
        $(
            impl<T> Bind for $ty<T>
            where
                T: Bind $(+ $bound $(+ $rest)*)?,
            {
                fn field_type() -> FieldType {
                    FieldType::Sequence(Box::new(T::field_type()))
                }

                fn to_datum(&self) -> Result<Datum> {
                    self.iter()
                        .map(Bind::to_datum)
                        .collect::<Result<_>>()
                        .map(Datum::Sequence)
                }

                fn from_datum(datum: Datum) -> Result<Self> {
                    match datum {
                        Datum::Sequence(items) => items.into_iter().map(T::from_datum).collect(),
                        Datum::Null => Ok(Self::new()),
                        other => Err(other.mismatch("sequence")),
                    }
                }
            }
        )*
    };
}

impl_bind_sequence!(Vec<T>, VecDeque<T>, BTreeSet<T: Ord>);

impl<T, S> Bind for HashSet<T, S>
where
    T: Bind + Eq + Hash,
    S: BuildHasher + Default,
{
    fn field_type() -> FieldType {
        FieldType::Sequence(Box::new(T::field_type()))
    }

    fn to_datum(&self) -> Result<Datum> {
        self.iter()
            .map(Bind::to_datum)
            .collect::<Result<_>>()
            .map(Datum::Sequence)
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Sequence(items) => items.into_iter().map(T::from_datum).collect(),
            Datum::Null => Ok(Self::default()),
            other => Err(other.mismatch("sequence")),
        }
    }
}

fn map_to_datum<'a, K, V, I>(entries: I) -> Result<Datum>
where
    K: Bind + 'a,
    V: Bind + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    entries
        .map(|(k, v)| -> Result<(Datum, Datum)> { Ok((k.to_datum()?, v.to_datum()?)) })
        .collect::<Result<_>>()
        .map(Datum::Mapping)
}

fn map_from_datum<K, V, M>(datum: Datum) -> Result<M>
where
    K: Bind,
    V: Bind,
    M: FromIterator<(K, V)> + Default,
{
    match datum {
        Datum::Mapping(entries) => entries
            .into_iter()
            .map(|(k, v)| -> Result<(K, V)> { Ok((K::from_datum(k)?, V::from_datum(v)?)) })
            .collect(),
        Datum::Null => Ok(M::default()),
        other => Err(other.mismatch("mapping")),
    }
}

/// Entries are written in the map's iteration order, which is unspecified
/// for a `HashMap`.
impl<K, V, S> Bind for HashMap<K, V, S>
where
    K: Bind + Eq + Hash,
    V: Bind,
    S: BuildHasher + Default,
{
    fn field_type() -> FieldType {
        FieldType::Mapping(Box::new(K::field_type()), Box::new(V::field_type()))
    }

    fn to_datum(&self) -> Result<Datum> {
        map_to_datum(self.iter())
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        map_from_datum(datum)
    }
}

impl<K, V> Bind for BTreeMap<K, V>
where
    K: Bind + Ord,
    V: Bind,
{
    fn field_type() -> FieldType {
        FieldType::Mapping(Box::new(K::field_type()), Box::new(V::field_type()))
    }

    fn to_datum(&self) -> Result<Datum> {
        map_to_datum(self.iter())
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        map_from_datum(datum)
    }
}
