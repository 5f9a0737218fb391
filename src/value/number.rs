use core::fmt::{self, Debug, Display};
use std::str::FromStr;

use faststr::FastStr;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::{
    error::{Error, ErrorCode, Result},
    util::private::Sealed,
};

/// Represents a JSON number with arbitrary precision. The underlying
/// representation is the validated decimal text, so large integers and long
/// fractions survive a parse/encode cycle unchanged.
///
/// # Examples
///
/// ```
/// use jsonbind::{JsonNumberTrait, Number};
///
/// let num: Number = "9223372036854775807".parse().unwrap();
/// assert_eq!(num.as_i64(), Some(i64::MAX));
///
/// let num: Number = "1.2333333333333333333333333333333333333333".parse().unwrap();
/// assert_eq!(num.as_str(), "1.2333333333333333333333333333333333333333");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Number {
    n: FastStr,
}

pub trait JsonNumberTrait: Sealed {
    fn is_i64(&self) -> bool;
    fn is_u64(&self) -> bool;
    fn is_f64(&self) -> bool;
    fn as_i64(&self) -> Option<i64>;
    fn as_u64(&self) -> Option<u64>;
    fn as_f64(&self) -> Option<f64>;
}

impl Number {
    /// Caller guarantees `n` is a valid decimal literal.
    pub(crate) fn from_faststr(n: FastStr) -> Self {
        debug_assert!(is_number(n.as_str()));
        Self { n }
    }

    /// Returns the underlying text representation of the number.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.n.as_str()
    }

    /// Converts a finite `f64` to a `Number`. Infinite or NaN values are not
    /// JSON numbers.
    #[inline]
    pub fn from_f64(f: f64) -> Option<Number> {
        f.is_finite().then(|| Number {
            n: FastStr::new(ryu::Buffer::new().format_finite(f)),
        })
    }

    /// Converts a finite `f32` to a `Number`, using the shortest text that
    /// round-trips through `f32`.
    #[inline]
    pub fn from_f32(f: f32) -> Option<Number> {
        f.is_finite().then(|| Number {
            n: FastStr::new(ryu::Buffer::new().format_finite(f)),
        })
    }

    /// Represents the number as an exact decimal, if it fits into the 96-bit
    /// mantissa of `rust_decimal::Decimal`.
    pub fn as_decimal(&self) -> Option<Decimal> {
        let text = self.as_str();
        let text = text.strip_prefix('+').unwrap_or(text);
        if text.contains(['e', 'E']) {
            Decimal::from_scientific(text).ok()
        } else {
            Decimal::from_str_exact(text).ok()
        }
    }

    /// Parses the number as any integer type, rejecting fractions and
    /// out-of-range values.
    pub(crate) fn as_integer<T>(&self) -> Result<T>
    where
        T: TryFrom<i128>,
    {
        let text = self.as_str();
        let wide: i128 = text
            .strip_prefix('+')
            .unwrap_or(text)
            .parse()
            .map_err(|_| Error::invalid_scalar("integer", text))?;
        T::try_from(wide).map_err(|_| Error::new(ErrorCode::NumberOutOfRange(text.into())))
    }
}

impl JsonNumberTrait for Number {
    /// Returns true if the `Number` is an integer between `i64::MIN` and
    /// `i64::MAX`.
    #[inline]
    fn is_i64(&self) -> bool {
        self.as_i64().is_some()
    }

    /// Returns true if the `Number` is an integer between zero and `u64::MAX`.
    #[inline]
    fn is_u64(&self) -> bool {
        self.as_u64().is_some()
    }

    /// Returns true if the `Number` can be represented by a finite f64.
    #[inline]
    fn is_f64(&self) -> bool {
        self.as_f64().is_some()
    }

    #[inline]
    fn as_i64(&self) -> Option<i64> {
        self.as_integer().ok()
    }

    #[inline]
    fn as_u64(&self) -> Option<u64> {
        self.as_integer().ok()
    }

    /// Represents the number as finite f64 if possible. Returns None otherwise.
    #[inline]
    fn as_f64(&self) -> Option<f64> {
        self.n.parse::<f64>().ok().filter(|float| float.is_finite())
    }
}

macro_rules! impl_from_integer {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Number {
                #[inline]
                fn from(i: $ty) -> Self {
                    Number {
                        n: FastStr::new(itoa::Buffer::new().format(i)),
                    }
                }
            }
        )*
    };
}

impl_from_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl From<Decimal> for Number {
    fn from(d: Decimal) -> Self {
        Number {
            n: FastStr::new(d.to_string()),
        }
    }
}

impl FromStr for Number {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if is_number(trimmed) {
            Ok(Number {
                n: FastStr::new(trimmed),
            })
        } else {
            Err(Error::syntax(ErrorCode::InvalidNumber, 1, 1, s))
        }
    }
}

impl Display for Number {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Debug for Number {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "Number({})", self)
    }
}

impl Serialize for Number {
    /// Integers and finite floats are handed over natively; anything wider
    /// falls back to its exact text.
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Some(u) = self.as_u64() {
            serializer.serialize_u64(u)
        } else if let Some(i) = self.as_i64() {
            serializer.serialize_i64(i)
        } else if let Some(f) = self.as_f64() {
            serializer.serialize_f64(f)
        } else {
            serializer.serialize_str(self.as_str())
        }
    }
}

/// Checks the decimal literal grammar: an optional sign, digits with at most
/// one decimal point (at least one digit overall), then an optional exponent.
pub(crate) fn is_number(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}
