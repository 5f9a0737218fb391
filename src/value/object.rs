//! Represents a parsed JSON object.
use std::{iter::FusedIterator, slice};

use faststr::FastStr;

use crate::value::node::Value;

/// Represents the JSON object. The inner implementation is a key-value array
/// whose order is the order keys were first seen in the source text.
///
/// Keys are unique: inserting an existing key replaces its value in place, so
/// a duplicated key in the source keeps the last value at the first position.
///
/// # Examples
/// ```
/// use jsonbind::{parse, Value};
///
/// let value = parse(r#"{"a": 1, "b": true, "a": null}"#).unwrap();
/// let obj = value.as_object().unwrap();
///
/// assert_eq!(obj.len(), 2);
/// assert_eq!(obj.get("a"), Some(&Value::Null));
/// assert_eq!(obj.keys().collect::<Vec<_>>(), ["a", "b"]);
/// ```
///
/// # Warning
/// The keys are not sorted or hashed and `get` is O(n).
#[derive(Debug, Clone, Default)]
pub struct Object {
    entries: Vec<(FastStr, Value)>,
}

impl PartialEq for Object {
    /// Key order does not take part in equality.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

#[doc(hidden)]
pub type Pair = (FastStr, Value);

impl Object {
    /// Create a new empty object.
    #[inline]
    pub fn new() -> Object {
        Object {
            entries: Vec::new(),
        }
    }

    /// Create a new empty object with capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Object {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns a reference to the value of `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    /// Inserts a key-value pair, returning the old value if the key was
    /// already present. An existing key keeps its position.
    pub fn insert<K: Into<FastStr>>(&mut self, key: K, value: Value) -> Option<Value> {
        let key = key.into();
        match self.get_mut(key.as_str()) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Removes `key` and returns its value, preserving the order of the
    /// remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k.as_str() == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Returns an iterator over the entries in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.entries.iter())
    }

    /// Returns an iterator over the keys in insertion order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns an iterator over the values in insertion order.
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }
}

/// An iterator over the entries of an [`Object`].
pub struct Iter<'a>(slice::Iter<'a, Pair>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {}

impl<'a> FusedIterator for Iter<'a> {}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Object {
    type Item = Pair;
    type IntoIter = std::vec::IntoIter<Pair>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<FastStr>> FromIterator<(K, Value)> for Object {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        let mut obj = Object::new();
        for (k, v) in iter {
            obj.insert(k, v);
        }
        obj
    }
}

impl<K: Into<FastStr>> Extend<(K, Value)> for Object {
    fn extend<T: IntoIterator<Item = (K, Value)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
