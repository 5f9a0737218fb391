//! Explicit descriptions of the shapes the codec binds JSON to.

use std::fmt;

/// The declared type of a record field, a sequence element or a mapping
/// key/value.
#[derive(Clone)]
pub enum FieldType {
    Boolean,
    Integer,
    Float,
    /// Exact-precision decimal.
    Decimal,
    String,
    Uuid,
    /// Calendar date, written as `yyyy-MM-dd`.
    Date,
    /// Timestamp with a numeric UTC offset.
    Timestamp,
    /// One of a closed set of names.
    Enumeration(&'static [&'static str]),
    Sequence(Box<FieldType>),
    Mapping(Box<FieldType>, Box<FieldType>),
    Record(&'static Schema),
}

impl FieldType {
    /// A short human readable name, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Decimal => "decimal",
            FieldType::String => "string",
            FieldType::Uuid => "uuid",
            FieldType::Date => "date",
            FieldType::Timestamp => "timestamp",
            FieldType::Enumeration(_) => "enumeration",
            FieldType::Sequence(_) => "sequence",
            FieldType::Mapping(..) => "mapping",
            FieldType::Record(schema) => schema.name,
        }
    }

    /// Whether a value of this type can be written as the key of a JSON
    /// object.
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            FieldType::Sequence(_) | FieldType::Mapping(..) | FieldType::Record(_)
        )
    }
}

// Records are compared and printed by name only, so that self-referential
// schemas terminate.
impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldType::Enumeration(a), FieldType::Enumeration(b)) => a == b,
            (FieldType::Sequence(a), FieldType::Sequence(b)) => a == b,
            (FieldType::Mapping(ak, av), FieldType::Mapping(bk, bv)) => ak == bk && av == bv,
            (FieldType::Record(a), FieldType::Record(b)) => std::ptr::eq(*a, *b),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Enumeration(names) => f.debug_tuple("Enumeration").field(names).finish(),
            FieldType::Sequence(elem) => f.debug_tuple("Sequence").field(elem).finish(),
            FieldType::Mapping(k, v) => f.debug_tuple("Mapping").field(k).field(v).finish(),
            FieldType::Record(schema) => write!(f, "Record({})", schema.name),
            other => f.write_str(match other {
                FieldType::Boolean => "Boolean",
                FieldType::Integer => "Integer",
                FieldType::Float => "Float",
                FieldType::Decimal => "Decimal",
                FieldType::String => "String",
                FieldType::Uuid => "Uuid",
                FieldType::Date => "Date",
                _ => "Timestamp",
            }),
        }
    }
}

/// One named field of a record, in declaration order.
#[derive(Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    /// `None` marks a transient field: it is never written and never read.
    pub ty: Option<fn() -> FieldType>,
}

impl Field {
    #[inline]
    pub fn is_transient(&self) -> bool {
        self.ty.is_none()
    }

    /// The declared type, or `None` for a transient field.
    #[inline]
    pub fn field_type(&self) -> Option<FieldType> {
        self.ty.map(|ty| ty())
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field_type() {
            Some(ty) => write!(f, "{}: {:?}", self.name, ty),
            None => write!(f, "{}: transient", self.name),
        }
    }
}

/// The ordered field layout of a record type.
///
/// Schemas are usually generated by [`record!`](crate::record) and live in a
/// `static`, so nested records refer to each other by `&'static Schema`.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    /// Position of the field called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A type that is described by a [`Schema`].
pub trait Record {
    fn schema() -> &'static Schema;
}
