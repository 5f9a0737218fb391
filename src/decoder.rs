//! Decode JSON text into Rust values, driven by their declared field types.

use chrono::{DateTime, NaiveDate};
use faststr::FastStr;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::{
    bind::Bind,
    config::DeserializeCfg,
    datum::{Datum, RecordDatum},
    encoder::DATE_FORMAT,
    error::{Error, ErrorCode, Result},
    parser::parse,
    schema::{FieldType, Schema},
    value::{number::is_number, Number, Object, Value},
};

/// A structure that decodes JSON into Rust values.
///
/// ```
/// use jsonbind::{record, Decoder};
///
/// record! {
///     #[derive(Debug, Default)]
///     pub struct Point {
///         pub x: i32,
///         pub y: i32,
///     }
/// }
///
/// let p: Point = Decoder::new().decode(r#"{"x": 1, "y": 2, "z": 3}"#).unwrap();
/// assert_eq!((p.x, p.y), (1, 2));
///
/// let strict = Decoder::new().deny_unknown_fields();
/// assert!(strict.decode::<Point>(r#"{"x": 1, "z": 3}"#).unwrap_err().is_data());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    cfg: DeserializeCfg,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on object keys that are not fields of the record being decoded,
    /// instead of ignoring them.
    pub fn deny_unknown_fields(mut self) -> Self {
        self.cfg.deny_unknown_fields = true;
        self
    }

    /// Parses `json` and decodes it as a `T`.
    pub fn decode<T: Bind>(&self, json: &str) -> Result<T> {
        let value = parse(json)?;
        self.decode_value(&value)
    }

    /// Decodes an already parsed [`Value`] as a `T`.
    pub fn decode_value<T: Bind>(&self, value: &Value) -> Result<T> {
        let ty = T::field_type();
        trace!(ty = ?ty, "decoding value");
        let datum = self.convert(value, &ty)?;
        T::from_datum(datum)
    }

    /// Converts `value` into a datum of type `ty`. `null` is accepted for
    /// every type.
    fn convert(&self, value: &Value, ty: &FieldType) -> Result<Datum> {
        if value.is_null() {
            return Ok(Datum::Null);
        }

        match ty {
            FieldType::Boolean => {
                let text = value.to_text();
                if text.eq_ignore_ascii_case("true") {
                    Ok(Datum::Boolean(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Ok(Datum::Boolean(false))
                } else {
                    Err(Error::invalid_scalar("boolean", &text))
                }
            }
            FieldType::Integer => {
                let n = number(value, "integer")?;
                n.as_integer::<i128>()?;
                Ok(Datum::Number(n))
            }
            FieldType::Float => {
                let n = number(value, "float")?;
                if n.as_str().parse::<f64>().is_err() {
                    return Err(Error::invalid_scalar("float", n.as_str()));
                }
                Ok(Datum::Number(n))
            }
            FieldType::Decimal => number(value, "decimal").map(Datum::Number),
            FieldType::String => Ok(Datum::String(value.to_text())),
            FieldType::Uuid => {
                let text = value.to_text();
                Uuid::parse_str(&text)
                    .map(Datum::Uuid)
                    .map_err(|_| Error::invalid_scalar("uuid", &text))
            }
            FieldType::Date => {
                let text = value.to_text();
                NaiveDate::parse_from_str(&text, DATE_FORMAT)
                    .map(Datum::Date)
                    .map_err(|_| Error::invalid_scalar("date", &text))
            }
            FieldType::Timestamp => {
                let text = value.to_text();
                DateTime::parse_from_rfc3339(&text)
                    .map(Datum::Timestamp)
                    .map_err(|_| Error::invalid_scalar("timestamp", &text))
            }
            FieldType::Enumeration(names) => {
                let text = value.to_text();
                names
                    .iter()
                    .copied()
                    .find(|name| *name == text.as_str())
                    .map(Datum::Enumeration)
                    .ok_or_else(|| Error::unknown_variant(&text, *names))
            }
            FieldType::Sequence(elem) => match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| self.convert(item, elem))
                    .collect::<Result<_>>()
                    .map(Datum::Sequence),
                other => Err(Error::invalid_type(other.get_type().as_str(), "sequence")),
            },
            FieldType::Mapping(key_ty, value_ty) => match value {
                Value::Object(object) => {
                    let mut entries = Vec::with_capacity(object.len());
                    for (key, value) in object.iter() {
                        let key = self.convert(&Value::String(FastStr::new(key)), key_ty)?;
                        entries.push((key, self.convert(value, value_ty)?));
                    }
                    Ok(Datum::Mapping(entries))
                }
                other => Err(Error::invalid_type(other.get_type().as_str(), "mapping")),
            },
            FieldType::Record(schema) => match value {
                Value::Object(object) => self.convert_record(object, *schema),
                other => Err(Error::invalid_type(other.get_type().as_str(), schema.name)),
            },
        }
    }

    fn convert_record(&self, object: &Object, schema: &'static Schema) -> Result<Datum> {
        let mut record = RecordDatum::new(schema);
        for (key, value) in object.iter() {
            let Some(idx) = schema.position(key) else {
                if self.cfg.deny_unknown_fields {
                    return Err(Error::new(ErrorCode::UnknownField {
                        field: key.into(),
                        record: schema.name,
                    }));
                }
                debug!(record = schema.name, field = key, "ignoring unknown field");
                continue;
            };

            let field = &schema.fields[idx];
            let Some(ty) = field.field_type() else {
                trace!(record = schema.name, field = key, "skipping transient field");
                continue;
            };
            let datum = self
                .convert(value, &ty)
                .map_err(|e| e.in_field(schema.name, field.name))?;
            record.set(idx, datum);
        }
        Ok(Datum::Record(record))
    }
}

/// The numeric text of `value`, which may also be a string holding a number.
fn number(value: &Value, expected: &'static str) -> Result<Number> {
    match value {
        Value::Number(n) => Ok(n.clone()),
        Value::String(s) if is_number(s) => Ok(Number::from_faststr(s.clone())),
        other => Err(Error::invalid_scalar(expected, &other.to_text())),
    }
}

/// Parses `json` and decodes it as a `T`, ignoring unknown object keys.
///
/// A `null` document decodes to `None` when `T` is an `Option`.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use jsonbind::decode;
///
/// let stock: HashMap<u32, Vec<bool>> = decode(r#"{"7": [true, FALSE]}"#).unwrap();
/// assert_eq!(stock[&7], [true, false]);
///
/// assert!(decode::<Option<Vec<u8>>>("null").unwrap().is_none());
/// assert!(decode::<u8>(r#""x""#).unwrap_err().is_data());
/// ```
pub fn decode<T: Bind>(json: &str) -> Result<T> {
    Decoder::new().decode(json)
}

/// Decodes an already parsed [`Value`] as a `T`.
pub fn from_value<T: Bind>(value: &Value) -> Result<T> {
    Decoder::new().decode_value(value)
}

#[cfg(test)]
mod test {
    use std::collections::{BTreeMap, HashMap};

    use chrono::{FixedOffset, TimeZone};
    use rust_decimal::Decimal;

    use super::*;
    use crate::{encode, record};

    record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Line {
            sku: String,
            count: u16,
            price: Decimal,
        }
    }

    record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Basket {
            id: Option<Uuid>,
            lines: Vec<Line>,
            notes: BTreeMap<u8, String>,
            placed: DateTime<FixedOffset>,
            total: f64 => transient,
        }
    }

    #[test]
    fn test_decode_scalars() {
        assert!(decode::<bool>("TRUE").unwrap());
        assert!(!decode::<bool>(r#""False""#).unwrap());
        assert!(decode::<bool>("1").unwrap_err().is_data());
        assert_eq!(decode::<i64>("-9223372036854775808").unwrap(), i64::MIN);
        assert_eq!(decode::<u16>(r#""42""#).unwrap(), 42);
        assert!(decode::<u16>("4.2").unwrap_err().is_data());
        assert!(decode::<i8>("300").unwrap_err().is_data());
        assert_eq!(decode::<f64>("1e3").unwrap(), 1000.0);
        assert_eq!(decode::<String>("12.50").unwrap(), "12.50");
        assert_eq!(decode::<String>(r#"{"a": [1]}"#).unwrap(), r#"{"a":[1]}"#);
    }

    #[test]
    fn test_decode_time_and_ids() {
        let date: NaiveDate = decode(r#""2000-02-29""#).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2000, 2, 29).unwrap());
        assert!(decode::<NaiveDate>(r#""2001-02-29""#).unwrap_err().is_data());

        let ts: DateTime<FixedOffset> = decode(r#""2024-05-01T10:00:00.000000001-07:30""#).unwrap();
        let offset = FixedOffset::west_opt(7 * 3600 + 1800).unwrap();
        let expected = offset.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(1);
        assert_eq!(ts, expected);
        assert_eq!(ts.offset(), &offset);

        let id: Uuid = decode(r#""67E55044-10B1-426F-9247-BB680E5FE0C8""#).unwrap();
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert!(decode::<Uuid>(r#""not-a-uuid""#).unwrap_err().is_data());
    }

    #[test]
    fn test_decode_record() {
        let json = r#"{
            "id": null,
            "lines": [{"sku": "A-1", "count": 2, "price": 0.10}, {"sku": "B", "extra": true}],
            "notes": {"1": "fragile", "2": "gift"},
            "placed": "2024-01-02T03:04:05.000000000+00:00",
            "total": 99.5,
            "unknown": [1, 2, 3]
        }"#;
        let basket: Basket = decode(json).unwrap();
        assert_eq!(basket.id, None);
        assert_eq!(basket.lines.len(), 2);
        assert_eq!(basket.lines[0].price.to_string(), "0.10");
        assert_eq!(basket.lines[1], Line { sku: "B".to_string(), ..Default::default() });
        assert_eq!(basket.notes[&2], "gift");
        assert_eq!(basket.total, 0.0);
    }

    #[test]
    fn test_decode_null_and_absent_fields() {
        let basket: Basket = decode(r#"{"lines": null}"#).unwrap();
        assert_eq!(basket, Basket::default());
        assert!(decode::<Option<Basket>>("null").unwrap().is_none());
        assert!(decode::<Basket>("null").unwrap_err().is_data());
        assert!(decode::<Basket>("[]").unwrap_err().is_data());
    }

    #[test]
    fn test_decode_error_names_field() {
        let err = decode::<Basket>(r#"{"lines": [{"count": "many"}]}"#).unwrap_err();
        assert!(err.is_data());
        assert_eq!(
            err.to_string(),
            "Basket.lines: Line.count: invalid integer value `many`"
        );
    }

    #[test]
    fn test_decode_deny_unknown_fields() {
        let strict = Decoder::new().deny_unknown_fields();
        let err = strict.decode::<Line>(r#"{"sku": "A", "color": "red"}"#).unwrap_err();
        assert_eq!(err.to_string(), "unknown field `color` in record `Line`");
        assert!(strict.decode::<Line>(r#"{"sku": "A"}"#).is_ok());
    }

    #[test]
    fn test_decode_raw_map_keys() {
        let map: HashMap<u8, bool> = decode(r#"{1: true, "2": false}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert!(map[&1]);
        assert!(!map[&2]);
    }

    #[test]
    fn test_decode_round_trip() {
        let offset = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let basket = Basket {
            id: Some(Uuid::from_u128(42)),
            lines: vec![Line {
                sku: "X".to_string(),
                count: 3,
                price: Decimal::from(i64::MAX),
            }],
            notes: BTreeMap::from([(0, "first".to_string())]),
            placed: offset.with_ymd_and_hms(2023, 7, 8, 9, 10, 11).unwrap()
                + chrono::Duration::nanoseconds(123_456_789),
            total: 0.0,
        };
        let json = encode(&basket).unwrap();
        assert_eq!(decode::<Basket>(&json).unwrap(), basket);
        assert_eq!(from_value::<Basket>(&parse(&json).unwrap()).unwrap(), basket);
    }
}
