use std::{fmt, ops};

use faststr::FastStr;

use super::object::Object;
use crate::{encoder::to_string_value, Number};

/// JsonType is an enum that represents the type of a JSON value.
///
/// # Examples
/// ```
/// use jsonbind::{parse, JsonType};
///
/// let json = parse(r#"{"a": 1, "b": true}"#).unwrap();
///
/// assert_eq!(json["a"].get_type(), JsonType::Number);
/// assert_eq!(json.get_type(), JsonType::Object);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum JsonType {
    Null = 0,
    Boolean = 1,
    Number = 2,
    String = 3,
    Object = 4,
    Array = 5,
}

impl JsonType {
    /// A short human readable name, used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Object => "object",
            JsonType::Array => "array",
        }
    }
}

/// An untyped JSON value, as produced by [`crate::parse`].
///
/// Strings are kept verbatim: escape sequences in the source are neither
/// processed when parsing nor produced when encoding. Because the parser
/// still treats `\"` as an escaped quote, a string that contains a `"` or
/// ends in a `\` does not survive an encode and parse round trip.
#[derive(Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(FastStr),
    Array(Vec<Value>),
    Object(Object),
}

static NULL: Value = Value::Null;

impl Value {
    /// Gets the type of the value.
    #[inline]
    pub fn get_type(&self) -> JsonType {
        match self {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Boolean,
            Value::Number(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    pub fn is_str(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a.as_slice()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up `key` if this is an object.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Length of an array or object, zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            Value::Array(a) => a.len(),
            Value::Object(o) => o.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The textual form of the value: strings without their quotes, numbers
    /// in their source spelling, containers as compact JSON.
    pub fn to_text(&self) -> FastStr {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => FastStr::new(n.as_str()),
            Value::Bool(true) => FastStr::from_static_str("true"),
            Value::Bool(false) => FastStr::from_static_str("false"),
            Value::Null => FastStr::from_static_str("null"),
            Value::Array(_) | Value::Object(_) => FastStr::new(to_string_value(self)),
        }
    }
}

impl ops::Index<&str> for Value {
    type Output = Value;

    /// Returns `Value::Null` when `self` is not an object or has no such key.
    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl ops::Index<usize> for Value {
    type Output = Value;

    /// Returns `Value::Null` when `self` is not an array or is too short.
    fn index(&self, idx: usize) -> &Value {
        self.as_array().and_then(|a| a.get(idx)).unwrap_or(&NULL)
    }
}

impl fmt::Display for Value {
    /// Compact JSON text of the value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_string_value(self))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "{n:?}"),
            Value::String(s) => write!(f, "String({:?})", s.as_str()),
            Value::Array(a) => {
                f.write_str("Array ")?;
                f.debug_list().entries(a).finish()
            }
            Value::Object(o) => {
                f.write_str("Object ")?;
                f.debug_map().entries(o.iter()).finish()
            }
        }
    }
}
