//! A dynamic type to representing any parsed JSON value.

mod from;
pub(crate) mod node;
pub mod number;
pub mod object;
mod ser;

#[doc(inline)]
pub use self::node::{JsonType, Value};
#[doc(inline)]
pub use self::number::{JsonNumberTrait, Number};
#[doc(inline)]
pub use self::object::Object;
