use std::str::FromStr;

use faststr::FastStr;

use super::object::Object;
use crate::{error::Error, parser::parse, value::node::Value, Number};

impl From<Number> for Value {
    #[inline]
    fn from(val: Number) -> Self {
        Value::Number(val)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Value {
                fn from(val: $ty) -> Self {
                    Value::Number(val.into())
                }
            }
        )*
    };
}

impl_from_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl TryFrom<f64> for Value {
    type Error = Error;

    /// Fails for NaN and infinities, which have no JSON spelling.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Number::from_f64(value)
            .map(Value::Number)
            .ok_or_else(|| Error::new(crate::error::ErrorCode::NonFiniteFloat))
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<&str> for Value {
    /// The string is copied into the `Value` as is.
    #[inline]
    fn from(val: &str) -> Self {
        Value::String(FastStr::new(val))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(val: String) -> Self {
        Value::String(FastStr::from(val))
    }
}

impl From<FastStr> for Value {
    #[inline]
    fn from(val: FastStr) -> Self {
        Value::String(val)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    /// `None` becomes `null`.
    #[inline]
    fn from(val: Option<T>) -> Self {
        val.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    #[inline]
    fn from(val: Vec<T>) -> Self {
        Value::Array(val.into_iter().map(Into::into).collect())
    }
}

impl From<Object> for Value {
    #[inline]
    fn from(val: Object) -> Self {
        Value::Object(val)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    /// Collects into a JSON array.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

impl FromStr for Value {
    type Err = Error;

    /// Parses JSON text, see [`crate::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from(7u8), "7".parse::<Value>().unwrap());
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1,2]");
        assert_eq!(Value::try_from(2.5).unwrap().to_string(), "2.5");
        assert!(Value::try_from(f64::NAN).unwrap_err().is_encode());
        let collected: Value = ["a", "b"].into_iter().collect();
        assert_eq!(collected.to_string(), r#"["a","b"]"#);
    }
}
