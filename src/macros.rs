/// Define a struct together with its [`Schema`](crate::Schema), implementing
/// [`Record`](crate::Record) and [`Bind`](crate::Bind) for it.
///
/// Fields are written in declaration order under their Rust names. A field
/// followed by `=> transient` is left out of the encoded JSON and is set to
/// its `Default` value when decoding. Every field type must implement
/// `Bind + Default`, so a record nested by value in another record needs
/// `#[derive(Default)]` as well.
///
/// ```
/// use jsonbind::{decode, encode, record};
///
/// record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Product {
///         pub name: String,
///         pub price: f64,
///         pub cached_label: String => transient,
///     }
/// }
///
/// let apple = Product {
///     name: "Apple".to_string(),
///     price: 5.5,
///     cached_label: "Apple (5.5)".to_string(),
/// };
/// let json = encode(&apple).unwrap();
/// assert_eq!(json, r#"{"name":"Apple","price":5.5}"#);
///
/// let back: Product = decode(&json).unwrap();
/// assert_eq!(back.name, "Apple");
/// assert_eq!(back.cached_label, "");
/// ```
#[macro_export]
macro_rules! record {
    (@type $fty:ty, transient) => {
        ::core::option::Option::None
    };
    (@type $fty:ty) => {
        ::core::option::Option::Some(
            <$fty as $crate::Bind>::field_type as fn() -> $crate::FieldType,
        )
    };

    (@put $record:ident, $value:expr, $fname:expr, transient) => {};
    (@put $record:ident, $value:expr, $fname:expr) => {
        $record.put($fname, &$value)?;
    };

    (@take $record:ident, $fname:expr, transient) => {
        ::core::default::Default::default()
    };
    (@take $record:ident, $fname:expr) => {
        $record.take($fname)?
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $(=> $mark:ident)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::Record for $name {
            fn schema() -> &'static $crate::Schema {
                static SCHEMA: $crate::Schema = $crate::Schema {
                    name: ::core::stringify!($name),
                    fields: &[
                        $(
                            $crate::Field {
                                name: ::core::stringify!($field),
                                ty: $crate::record!(@type $fty $(, $mark)?),
                            },
                        )*
                    ],
                };
                &SCHEMA
            }
        }

        impl $crate::Bind for $name {
            fn field_type() -> $crate::FieldType {
                $crate::FieldType::Record(<Self as $crate::Record>::schema())
            }

            #[allow(unused_mut)]
            fn to_datum(&self) -> $crate::Result<$crate::Datum> {
                let mut record = $crate::RecordDatum::new(<Self as $crate::Record>::schema());
                $(
                    $crate::record!(@put record, self.$field, ::core::stringify!($field) $(, $mark)?);
                )*
                ::core::result::Result::Ok($crate::Datum::Record(record))
            }

            #[allow(unused_mut)]
            fn from_datum(datum: $crate::Datum) -> $crate::Result<Self> {
                let mut record = datum.into_record(<Self as $crate::Record>::schema())?;
                ::core::result::Result::Ok($name {
                    $(
                        $field: $crate::record!(@take record, ::core::stringify!($field) $(, $mark)?),
                    )*
                })
            }
        }
    };
}

/// Define a fieldless enum that is written as the quoted name of its
/// variant.
///
/// ```
/// use jsonbind::{decode, encode, enumeration};
///
/// enumeration! {
///     #[derive(Debug, Clone, Copy, PartialEq)]
///     pub enum Status {
///         Pending,
///         Shipped,
///     }
/// }
///
/// assert_eq!(encode(&vec![Status::Shipped]).unwrap(), r#"["Shipped"]"#);
/// assert_eq!(decode::<Status>(r#""Pending""#).unwrap(), Status::Pending);
/// assert!(decode::<Status>(r#""Lost""#).unwrap_err().is_data());
/// ```
#[macro_export]
macro_rules! enumeration {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
        }

        impl $name {
            /// Variant names in declaration order.
            pub const NAMES: &'static [&'static str] = &[$(::core::stringify!($variant)),*];

            pub fn name(&self) -> &'static str {
                match self {
                    $(
                        $name::$variant => ::core::stringify!($variant),
                    )*
                }
            }
        }

        impl $crate::Bind for $name {
            fn field_type() -> $crate::FieldType {
                $crate::FieldType::Enumeration(Self::NAMES)
            }

            fn to_datum(&self) -> $crate::Result<$crate::Datum> {
                ::core::result::Result::Ok($crate::Datum::Enumeration(self.name()))
            }

            fn from_datum(datum: $crate::Datum) -> $crate::Result<Self> {
                let name = match datum {
                    $crate::Datum::Enumeration(name) => name,
                    other => return ::core::result::Result::Err(other.mismatch("enumeration")),
                };
                $(
                    if name == ::core::stringify!($variant) {
                        return ::core::result::Result::Ok($name::$variant);
                    }
                )*
                ::core::result::Result::Err($crate::Error::unknown_variant(name, Self::NAMES))
            }
        }
    };
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use crate::{Bind, Datum, FieldType, Record};

    record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Inner {
            tags: Vec<String>,
        }
    }

    record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Outer {
            id: u32,
            inner: Inner,
            scratch: BTreeMap<String, u8> => transient,
            maybe: Option<Box<Inner>> => transient,
        }
    }

    enumeration! {
        #[derive(Debug, Clone, Copy, Default, PartialEq)]
        enum Color {
            #[default]
            Red,
            Green,
        }
    }

    #[test]
    fn test_record_schema() {
        let schema = Outer::schema();
        assert_eq!(schema.name, "Outer");
        let names: Vec<_> = schema.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["id", "inner", "scratch", "maybe"]);
        assert!(!schema.fields[1].is_transient());
        assert!(schema.fields[2].is_transient());
        assert_eq!(
            schema.fields[1].field_type(),
            Some(FieldType::Record(Inner::schema()))
        );
        assert!(std::ptr::eq(Outer::schema(), Outer::schema()));
    }

    #[test]
    fn test_record_datum_round_trip() {
        let value = Outer {
            id: 3,
            inner: Inner {
                tags: vec!["a".to_string()],
            },
            scratch: BTreeMap::from([("k".to_string(), 1)]),
            maybe: None,
        };
        let datum = value.to_datum().unwrap();
        let back = Outer::from_datum(datum).unwrap();
        assert_eq!(back.id, 3);
        assert_eq!(back.inner, value.inner);
        assert!(back.scratch.is_empty());
    }

    #[test]
    fn test_enumeration() {
        assert_eq!(Color::NAMES, ["Red", "Green"]);
        assert_eq!(Color::Green.name(), "Green");
        assert_eq!(
            Color::field_type(),
            FieldType::Enumeration(&["Red", "Green"])
        );
        assert_eq!(
            Color::from_datum(Datum::Enumeration("Green")).unwrap(),
            Color::Green
        );
        assert!(Color::from_datum(Datum::Enumeration("Blue"))
            .unwrap_err()
            .is_data());
        assert!(Color::from_datum(Datum::Boolean(true)).unwrap_err().is_data());
    }
}
