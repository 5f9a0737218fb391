//! When parsing, encoding or decoding JSON goes wrong.

use core::fmt::{self, Debug, Display};
use core::result;
use std::error;

/// This type represents all possible errors that can occur when parsing,
/// encoding or decoding JSON data.
pub struct Error {
    /// Boxed to keep `Result<T, Error>` as small as possible.
    err: Box<ErrorImpl>,
}

/// Alias for a `Result` with the error type `jsonbind::Error`.
pub type Result<T> = result::Result<T, Error>;

impl Error {
    /// One-based line number at which the error was detected.
    ///
    /// Zero when the error is not tied to a position in the input text, for
    /// example a value that cannot be converted to its declared field type.
    pub fn line(&self) -> usize {
        self.err.line
    }

    /// One-based column number at which the error was detected.
    pub fn column(&self) -> usize {
        self.err.column
    }

    /// The offending fragment of the input, if one was recorded.
    pub fn fragment(&self) -> Option<&str> {
        self.err.fragment.as_deref()
    }

    /// Categorizes the cause of this error.
    ///
    /// - `Category::Syntax` - input that is not well-formed JSON
    /// - `Category::Data` - a value that cannot be converted to its declared type
    /// - `Category::Encode` - a value that has no JSON representation
    /// - `Category::Io` - failure to write bytes to an I/O stream
    pub fn classify(&self) -> Category {
        self.err.code.classify()
    }

    /// Returns true if this error was caused by input that was not
    /// well-formed JSON.
    pub fn is_syntax(&self) -> bool {
        self.classify() == Category::Syntax
    }

    /// Returns true if this error was caused by a parsed value that could not
    /// be bound to the declared type of its field.
    ///
    /// For example, a JSON string `"abc"` is semantically incorrect when the
    /// field it is bound to is declared as an integer.
    pub fn is_data(&self) -> bool {
        self.classify() == Category::Data
    }

    /// Returns true if this error was raised while encoding a value.
    pub fn is_encode(&self) -> bool {
        self.classify() == Category::Encode
    }

    /// Returns true if this error was caused by a failure to write bytes on
    /// an I/O stream.
    pub fn is_io(&self) -> bool {
        self.classify() == Category::Io
    }
}

/// Categorizes the cause of a `jsonbind::Error`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Category {
    /// The input text is not well-formed JSON.
    Syntax,

    /// The input is well-formed, but a value cannot be converted to the
    /// declared type of the field it is bound to.
    Data,

    /// A value has no JSON representation, such as a NaN float.
    Encode,

    /// The encoder failed to write to its output stream.
    Io,
}

#[allow(clippy::fallible_impl_from)]
impl From<Error> for std::io::Error {
    /// Convert a `jsonbind::Error` into an `std::io::Error`.
    ///
    /// Syntax, data and encode errors are turned into `InvalidData` I/O errors.
    fn from(j: Error) -> Self {
        if let ErrorCode::Io(err) = j.err.code {
            err
        } else {
            std::io::Error::new(std::io::ErrorKind::InvalidData, j)
        }
    }
}

impl From<std::io::Error> for Error {
    #[cold]
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorCode::Io(err))
    }
}

struct ErrorImpl {
    code: ErrorCode,
    line: usize,
    column: usize,
    fragment: Option<Box<str>>,
    /// `Record.field` steps from the outermost record down, joined by `: `.
    path: Option<Box<str>>,
}

impl ErrorImpl {
    fn message(&self) -> String {
        match &self.path {
            Some(path) => format!("{path}: {}", self.code),
            None => self.code.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ErrorCode {
    /// Catchall for data error messages
    #[error("{0}")]
    Message(Box<str>),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Nothing but whitespace where a value was expected.
    #[error("EOF while parsing a value")]
    EofWhileParsingValue,

    #[error("EOF while parsing an object, expected `}}`")]
    EofWhileParsingObject,

    #[error("EOF while parsing an array, expected `]`")]
    EofWhileParsingArray,

    #[error("EOF while parsing a string")]
    EofWhileParsingString,

    /// A closing bracket without a matching opening one.
    #[error("unbalanced brackets")]
    UnbalancedBrackets,

    #[error("expected `:`")]
    ExpectedColon,

    /// An empty element between two commas.
    #[error("expected value")]
    ExpectedSomeValue,

    #[error("trailing comma")]
    TrailingComma,

    #[error("trailing characters")]
    TrailingCharacters,

    #[error("expected literal `null`, `true` or `false`")]
    ExpectedSomeLiteral,

    #[error("invalid number")]
    InvalidNumber,

    #[error("invalid type: {found}, expected {expected}")]
    InvalidType {
        found: &'static str,
        expected: &'static str,
    },

    #[error("invalid {expected} value `{text}`")]
    InvalidScalar { expected: &'static str, text: Box<str> },

    #[error("number `{0}` out of range")]
    NumberOutOfRange(Box<str>),

    #[error("unknown variant `{variant}`, expected one of {expected:?}")]
    UnknownVariant {
        variant: Box<str>,
        expected: &'static [&'static str],
    },

    #[error("unknown field `{field}` in record `{record}`")]
    UnknownField {
        field: Box<str>,
        record: &'static str,
    },

    #[error("NaN or Infinity is not a valid JSON value")]
    NonFiniteFloat,

    #[error("map key must be a string, number, boolean or date, found {0}")]
    KeyMustBeAScalar(&'static str),
}

impl ErrorCode {
    pub(crate) fn classify(&self) -> Category {
        match self {
            ErrorCode::Io(_) => Category::Io,

            ErrorCode::EofWhileParsingValue
            | ErrorCode::EofWhileParsingObject
            | ErrorCode::EofWhileParsingArray
            | ErrorCode::EofWhileParsingString
            | ErrorCode::UnbalancedBrackets
            | ErrorCode::ExpectedColon
            | ErrorCode::ExpectedSomeValue
            | ErrorCode::TrailingComma
            | ErrorCode::TrailingCharacters
            | ErrorCode::ExpectedSomeLiteral
            | ErrorCode::InvalidNumber => Category::Syntax,

            ErrorCode::NonFiniteFloat | ErrorCode::KeyMustBeAScalar(_) => Category::Encode,

            ErrorCode::Message(_)
            | ErrorCode::InvalidType { .. }
            | ErrorCode::InvalidScalar { .. }
            | ErrorCode::NumberOutOfRange(_)
            | ErrorCode::UnknownVariant { .. }
            | ErrorCode::UnknownField { .. } => Category::Data,
        }
    }
}

impl Error {
    #[cold]
    pub(crate) fn new(code: ErrorCode) -> Self {
        Error {
            err: Box::new(ErrorImpl {
                code,
                line: 0,
                column: 0,
                fragment: None,
                path: None,
            }),
        }
    }

    #[cold]
    pub(crate) fn syntax(code: ErrorCode, line: usize, column: usize, fragment: &str) -> Self {
        Error {
            err: Box::new(ErrorImpl {
                code,
                line,
                column,
                fragment: Some(truncate(fragment).into()),
                path: None,
            }),
        }
    }

    #[cold]
    pub(crate) fn invalid_type(found: &'static str, expected: &'static str) -> Self {
        Error::new(ErrorCode::InvalidType { found, expected })
    }

    #[cold]
    pub(crate) fn invalid_scalar(expected: &'static str, text: &str) -> Self {
        Error::new(ErrorCode::InvalidScalar {
            expected,
            text: truncate(text).into(),
        })
    }

    #[doc(hidden)]
    #[cold]
    pub fn unknown_variant(variant: &str, expected: &'static [&'static str]) -> Self {
        Error::new(ErrorCode::UnknownVariant {
            variant: truncate(variant).into(),
            expected,
        })
    }

    /// Attach the name of the record field being encoded or decoded, so
    /// that a failure deep inside nested records still names its path. The
    /// category is left as it was.
    #[cold]
    pub(crate) fn in_field(mut self, record: &str, field: &str) -> Self {
        if matches!(self.classify(), Category::Data | Category::Encode) {
            let path = match self.err.path.take() {
                Some(inner) => format!("{record}.{field}: {inner}"),
                None => format!("{record}.{field}"),
            };
            self.err.path = Some(path.into());
        }
        self
    }
}

/// Build a data error from a free-form message.
#[cold]
pub fn make_error(msg: String) -> Error {
    Error::new(ErrorCode::Message(msg.into_boxed_str()))
}

const MAX_FRAGMENT_LEN: usize = 48;

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(MAX_FRAGMENT_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.err.code {
            ErrorCode::Io(err) => err.source(),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&*self.err, f)
    }
}

impl Display for ErrorImpl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.line == 0 {
            return f.write_str(&self.message());
        }
        write!(
            f,
            "{} at line {} column {}",
            self.message(),
            self.line,
            self.column
        )?;
        match &self.fragment {
            Some(fragment) if !fragment.is_empty() => write!(f, " near `{fragment}`"),
            _ => Ok(()),
        }
    }
}

// Remove two layers of verbosity from the debug representation. Humans often
// end up seeing this representation because it is what unwrap() shows.
impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Error({:?}, line: {}, column: {})",
            self.err.message(),
            self.err.line,
            self.err.column
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_display_with_position() {
        let err = Error::syntax(ErrorCode::InvalidNumber, 2, 5, "12a");
        assert!(err.is_syntax());
        assert_eq!(err.line(), 2);
        assert_eq!(err.column(), 5);
        assert_eq!(err.fragment(), Some("12a"));
        assert_eq!(
            err.to_string(),
            "invalid number at line 2 column 5 near `12a`"
        );
    }

    #[test]
    fn test_error_in_field_keeps_category() {
        let err = Error::invalid_scalar("integer", "5.5").in_field("Product", "count");
        assert!(err.is_data());
        assert_eq!(
            err.to_string(),
            "Product.count: invalid integer value `5.5`"
        );

        let nested = err.in_field("Order", "products");
        assert_eq!(
            nested.to_string(),
            "Order.products: Product.count: invalid integer value `5.5`"
        );
    }

    #[test]
    fn test_error_in_field_on_encode() {
        let err = Error::new(ErrorCode::NonFiniteFloat)
            .in_field("Line", "weight")
            .in_field("Order", "lines");
        assert!(err.is_encode());
        assert_eq!(
            err.to_string(),
            "Order.lines: Line.weight: NaN or Infinity is not a valid JSON value"
        );

        let io = Error::from(std::io::Error::other("closed")).in_field("Order", "lines");
        assert_eq!(io.to_string(), "closed");
    }

    #[test]
    fn test_fragment_is_truncated() {
        let long = "x".repeat(200);
        let err = Error::syntax(ErrorCode::InvalidNumber, 1, 1, &long);
        assert_eq!(err.fragment().map(str::len), Some(MAX_FRAGMENT_LEN));
    }

    #[test]
    fn test_into_io_error() {
        let err = make_error("boom".to_string());
        assert!(err.is_data());
        let io: std::io::Error = err.into();
        assert_eq!(io.kind(), std::io::ErrorKind::InvalidData);
    }
}
