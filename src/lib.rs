mod macros;

mod bind;
mod config;
mod datum;
mod decoder;
mod encoder;
mod error;
mod parser;
mod reader;
mod schema;
mod util;

pub mod format;
pub mod value;

pub use crate::bind::Bind;
pub use crate::datum::{Datum, RecordDatum};
pub use crate::decoder::{decode, from_value, Decoder};
pub use crate::encoder::{encode, encode_pretty, encode_to_vec, encode_to_writer, Encoder};
pub use crate::error::*;
pub use crate::parser::parse;
pub use crate::schema::{Field, FieldType, Record, Schema};
pub use crate::value::*;
