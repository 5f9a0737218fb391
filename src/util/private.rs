use crate::Number;

// Prevent users from implementing the sealed traits in jsonbind.
pub trait Sealed {}
impl Sealed for Number {}
impl<'a, T> Sealed for &'a T where T: ?Sized + Sealed {}
