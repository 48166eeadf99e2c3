//! JSON value types.
//!
//! This module defines the [`Value`] enum, the owning tree produced by the
//! parser, and the [`ValueIndex`] trait used for sentinel-returning lookups.
use alloc::{string::String, vec::Vec};
use core::{fmt, ops};

use bstr::{BStr, BString, ByteSlice};

use crate::{OrderedMap, Sequence};

/// Returned by reference for every lookup miss.
pub(crate) static NONE: Value = Value::None;

/// A JSON value as defined by [RFC 8259], plus the [`None`] sentinel.
///
/// [`None`] means "no value": it is what lookups return on a miss. It is
/// distinct from [`Null`], is never produced by a successful parse and must
/// not be stored inside a container.
///
/// Strings are byte sequences. The parser does not validate UTF-8; use
/// [`Value::as_str`] for a checked text view.
///
/// # Examples
///
/// ```
/// use jsonstack::{OrderedMap, Value};
///
/// let mut map = OrderedMap::new();
/// map.set("key", Value::from("value")).unwrap();
/// let v = Value::Object(map);
/// assert_eq!(v["key"], Value::from("value"));
/// assert!(v["missing"].is_none());
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
/// [`None`]: Value::None
/// [`Null`]: Value::Null
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    None,
    Null,
    Boolean(bool),
    Number(f64),
    String(BString),
    Object(OrderedMap),
    Array(Sequence),
}

/// Frees a tree of any depth with an explicit worklist. Each popped value
/// has its children moved out first, so its own drop is shallow.
pub(crate) fn drop_nested(mut pending: Vec<Value>) {
    while let Some(mut value) = pending.pop() {
        match &mut value {
            Value::Array(seq) => seq.drain_into(&mut pending),
            Value::Object(map) => map.drain_into(&mut pending),
            _ => {}
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(BString::from(v))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::String(BString::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(BString::from(v))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::String(BString::from(v))
    }
}

impl From<BString> for Value {
    fn from(v: BString) -> Self {
        Self::String(v)
    }
}

impl From<Sequence> for Value {
    fn from(v: Sequence) -> Self {
        Self::Array(v)
    }
}

impl From<OrderedMap> for Value {
    fn from(v: OrderedMap) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` for the "no value" sentinel.
    ///
    /// ```
    /// use jsonstack::Value;
    ///
    /// assert!(Value::None.is_none());
    /// assert!(!Value::Null.is_none());
    /// ```
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` if the value is [`Null`](Value::Null).
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Boolean`](Value::Boolean).
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` if the value is [`Number`](Value::Number).
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    /// Returns `true` if the value is [`String`](Value::String).
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`](Value::Array).
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`](Value::Object).
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The raw bytes of a string value.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::String(s) => Some(s.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bstr(&self) -> Option<&BStr> {
        match self {
            Self::String(s) => Some(s.as_bstr()),
            _ => None,
        }
    }

    /// The string value as text, if it is valid UTF-8.
    ///
    /// ```
    /// use jsonstack::Value;
    ///
    /// assert_eq!(Value::from("héllo").as_str(), Some("héllo"));
    /// assert_eq!(Value::from(&b"\xFF"[..]).as_str(), None);
    /// ```
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| b.to_str().ok())
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Sequence> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&OrderedMap> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut OrderedMap> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up an array element or object member.
    ///
    /// Returns [`Value::None`] when the index is out of range, the key is
    /// missing, or `self` is not the matching container.
    ///
    /// ```
    /// use jsonstack::{parse, Value};
    ///
    /// let v = parse(br#"{"a":[10,20]}"#).unwrap();
    /// assert_eq!(v.get("a").get(1), &Value::from(20));
    /// assert!(v.get("a").get(2).is_none());
    /// assert!(v.get(0).is_none());
    /// ```
    #[must_use]
    pub fn get<I: ValueIndex>(&self, index: I) -> &Value {
        index.index_into(self)
    }

    /// Replaces the value with [`Value::None`] and returns the old one.
    pub fn take(&mut self) -> Value {
        core::mem::take(self)
    }

    /// Returns `true` for arrays and objects.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Human-readable name of the variant, used in diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
        }
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for str {}
    impl Sealed for [u8] {}
    impl Sealed for bstr::BStr {}
    impl Sealed for alloc::string::String {}
    impl Sealed for bstr::BString {}
    impl<T: ?Sized + Sealed> Sealed for &T {}
}

/// Types that can look up a member of a [`Value`]: `usize` for arrays, byte
/// or text keys for objects.
///
/// This trait is sealed.
pub trait ValueIndex: private::Sealed {
    #[doc(hidden)]
    fn index_into<'v>(&self, value: &'v Value) -> &'v Value;
}

impl ValueIndex for usize {
    fn index_into<'v>(&self, value: &'v Value) -> &'v Value {
        match value {
            Value::Array(seq) => seq.get(*self),
            _ => &NONE,
        }
    }
}

impl ValueIndex for [u8] {
    fn index_into<'v>(&self, value: &'v Value) -> &'v Value {
        match value {
            Value::Object(map) => map.get(self),
            _ => &NONE,
        }
    }
}

impl ValueIndex for str {
    fn index_into<'v>(&self, value: &'v Value) -> &'v Value {
        self.as_bytes().index_into(value)
    }
}

impl ValueIndex for BStr {
    fn index_into<'v>(&self, value: &'v Value) -> &'v Value {
        self.as_bytes().index_into(value)
    }
}

impl ValueIndex for String {
    fn index_into<'v>(&self, value: &'v Value) -> &'v Value {
        self.as_bytes().index_into(value)
    }
}

impl ValueIndex for BString {
    fn index_into<'v>(&self, value: &'v Value) -> &'v Value {
        self.as_slice().index_into(value)
    }
}

impl<T: ?Sized + ValueIndex> ValueIndex for &T {
    fn index_into<'v>(&self, value: &'v Value) -> &'v Value {
        (**self).index_into(value)
    }
}

impl<I: ValueIndex> ops::Index<I> for Value {
    type Output = Value;

    fn index(&self, index: I) -> &Value {
        index.index_into(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::ser::write_json_fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::*;

    #[test]
    fn none_and_null_are_distinct() {
        assert_ne!(Value::None, Value::Null);
        assert!(Value::default().is_none());
    }

    #[test]
    fn scalar_constructors_copy_their_input() {
        let owned = String::from("abc");
        let v = Value::from(owned.as_str());
        drop(owned);
        assert_eq!(v.as_bytes(), Some(&b"abc"[..]));
        assert_eq!(Value::from(2).as_f64(), Some(2.0));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(vec![0xC3, 0xA9]).as_str(), Some("é"));
    }

    #[test]
    fn accessors_check_the_tag() {
        let v = Value::Number(1.5);
        assert_eq!(v.as_bool(), None);
        assert_eq!(v.as_bytes(), None);
        assert!(v.as_array().is_none());
        assert!(v.as_object().is_none());
        assert_eq!(v.kind_name(), "number");
    }

    #[test]
    fn lookups_on_scalars_yield_none() {
        let v = Value::from("text");
        assert!(v[0].is_none());
        assert!(v["key"].is_none());
        assert!(v.get(&b"key"[..]).is_none());
    }

    #[test]
    fn indexing_into_containers() {
        let mut seq = Sequence::new();
        seq.push(Value::from(1)).unwrap();
        seq.push(Value::Null).unwrap();
        let mut map = OrderedMap::new();
        map.set("list", Value::Array(seq)).unwrap();
        let root = Value::Object(map);

        assert_eq!(root["list"][0], Value::from(1));
        assert!(root["list"][1].is_null());
        assert!(root["list"][2].is_none());
        assert!(root[String::from("other")].is_none());
        assert_eq!(root.to_string(), r#"{"list":[1,null]}"#);
    }

    #[test]
    fn take_leaves_the_sentinel() {
        let mut v = Value::from("x");
        let old = v.take();
        assert!(v.is_none());
        assert_eq!(old.as_str(), Some("x"));
    }
}
