use faststr::FastStr;

use crate::{
    error::{
        Error,
        ErrorCode::{self, *},
        Result,
    },
    reader::{offset_in, Position},
    value::{number::is_number, Number, Object, Value},
};

/// A recursive-descent parser over a complete JSON document held in memory.
///
/// Containers are parsed by splitting their interior at the commas that sit
/// outside any quoted string and any nested bracket, then parsing every piece
/// on its own. Strings are taken verbatim: escape sequences are honored while
/// looking for the closing quote but are never decoded.
pub(crate) struct Parser<'de> {
    root: &'de str,
}

impl<'de> Parser<'de> {
    pub fn new(root: &'de str) -> Self {
        Self { root }
    }

    pub fn parse(&self) -> Result<Value> {
        self.parse_value(self.root)
    }

    /// Error located at the start of `at`, which must be a slice of the root.
    #[cold]
    fn error(&self, code: ErrorCode, at: &str) -> Error {
        let pos = Position::from_index(offset_in(self.root, at), self.root.as_bytes());
        Error::syntax(code, pos.line, pos.column, at)
    }

    fn parse_value(&self, text: &'de str) -> Result<Value> {
        let text = trim(text);
        match text.as_bytes().first() {
            None => Err(self.error(EofWhileParsingValue, text)),
            Some(b'{') => self.parse_object(text),
            Some(b'[') => self.parse_array(text),
            Some(b'"') => self.parse_string(text),
            Some(_) => self.parse_scalar(text),
        }
    }

    fn parse_object(&self, text: &'de str) -> Result<Value> {
        if text.len() < 2 || !text.ends_with('}') {
            return Err(self.error(EofWhileParsingObject, text));
        }

        let inner = trim(&text[1..text.len() - 1]);
        let mut object = Object::new();
        if inner.is_empty() {
            return Ok(Value::Object(object));
        }

        for member in self.split_top_level(inner)? {
            let colon = match find_unquoted(member, b':') {
                Some(colon) => colon,
                None => return Err(self.error(ExpectedColon, member)),
            };
            let key = trim_quotes(trim(&member[..colon]));
            let value = self.parse_value(&member[colon + 1..])?;
            object.insert(FastStr::new(key), value);
        }
        Ok(Value::Object(object))
    }

    fn parse_array(&self, text: &'de str) -> Result<Value> {
        if text.len() < 2 || !text.ends_with(']') {
            return Err(self.error(EofWhileParsingArray, text));
        }

        let inner = trim(&text[1..text.len() - 1]);
        if inner.is_empty() {
            return Ok(Value::Array(Vec::new()));
        }

        let elements = self.split_top_level(inner)?;
        let mut array = Vec::with_capacity(elements.len());
        for element in elements {
            array.push(self.parse_value(element)?);
        }
        Ok(Value::Array(array))
    }

    fn parse_string(&self, text: &'de str) -> Result<Value> {
        match closing_quote(text) {
            None => Err(self.error(EofWhileParsingString, text)),
            Some(end) if end + 1 == text.len() => {
                Ok(Value::String(FastStr::new(&text[1..end])))
            }
            Some(end) => Err(self.error(TrailingCharacters, &text[end + 1..])),
        }
    }

    fn parse_scalar(&self, text: &'de str) -> Result<Value> {
        if text == "null" {
            Ok(Value::Null)
        } else if text.eq_ignore_ascii_case("true") {
            Ok(Value::Bool(true))
        } else if text.eq_ignore_ascii_case("false") {
            Ok(Value::Bool(false))
        } else if is_number(text) {
            Ok(Value::Number(Number::from_faststr(FastStr::new(text))))
        } else if text.as_bytes()[0].is_ascii_alphabetic() {
            Err(self.error(ExpectedSomeLiteral, text))
        } else {
            Err(self.error(InvalidNumber, text))
        }
    }

    /// Splits the interior of a container at its top-level commas. Every
    /// returned piece is trimmed and non-empty.
    fn split_top_level(&self, inner: &'de str) -> Result<Vec<&'de str>> {
        let bytes = inner.as_bytes();
        let mut pieces = Vec::new();
        let mut start = 0;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        // a backslash hides the next byte, so `"a\\"` closes but `"a\"` does not
        for (i, &ch) in bytes.iter().enumerate() {
            if in_string {
                match ch {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                b'"' => in_string = true,
                b'{' | b'[' => depth += 1,
                b'}' | b']' => {
                    depth = match depth.checked_sub(1) {
                        Some(depth) => depth,
                        None => return Err(self.error(UnbalancedBrackets, &inner[i..])),
                    };
                }
                b',' if depth == 0 => {
                    pieces.push(&inner[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }

        if in_string {
            return Err(self.error(EofWhileParsingString, &inner[start..]));
        }
        if depth != 0 {
            return Err(self.error(UnbalancedBrackets, &inner[start..]));
        }
        pieces.push(&inner[start..]);

        let last = pieces.len() - 1;
        for (i, piece) in pieces.iter_mut().enumerate() {
            let trimmed = trim(piece);
            if trimmed.is_empty() {
                let code = if i == last {
                    TrailingComma
                } else {
                    ExpectedSomeValue
                };
                return Err(self.error(code, piece));
            }
            *piece = trimmed;
        }
        Ok(pieces)
    }
}

/// Parses a complete JSON document into a [`Value`].
///
/// Strings keep their escape sequences verbatim and `true`/`false` are
/// accepted in any case.
///
/// # Examples
///
/// ```
/// use jsonbind::parse;
///
/// let value = parse(r#"[{"a":[1,2]},{"b":3}]"#).unwrap();
/// assert_eq!(value.len(), 2);
/// assert_eq!(value[0]["a"][1].as_number().unwrap().as_str(), "2");
///
/// assert!(parse(r#"{"a": [1, 2}"#).unwrap_err().is_syntax());
/// ```
pub fn parse(text: &str) -> Result<Value> {
    Parser::new(text).parse()
}

#[inline]
fn trim(text: &str) -> &str {
    text.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

/// Strips a quote from whichever end of `key` carries one.
fn trim_quotes(key: &str) -> &str {
    let key = key.strip_prefix('"').unwrap_or(key);
    key.strip_suffix('"').unwrap_or(key)
}

/// Index of the quote closing the string that opens at `text[0]`.
fn closing_quote(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, &ch) in text.as_bytes().iter().enumerate().skip(1) {
        match ch {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'"' => return Some(i),
            _ => {}
        }
    }
    None
}

/// Index of the first `needle` outside any quoted string.
fn find_unquoted(text: &str, needle: u8) -> Option<usize> {
    let mut in_string = false;
    let mut escaped = false;
    for (i, &ch) in text.as_bytes().iter().enumerate() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
        } else if ch == b'"' {
            in_string = true;
        } else if ch == needle {
            return Some(i);
        }
    }
    None
}
