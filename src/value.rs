//! Dynamic native value representation.
//!
//! [`Value`] is the host-side model that TOML documents decode into and
//! encode from: nested maps and sequences over scalars and calendar values.
//!
//! ## Core Types
//!
//! - [`Value`]: null, bool, integer, float, string, calendar, sequence, map,
//!   plus the two host types TOML cannot represent (big integers and bytes)
//! - [`Calendar`]: date, time, or date-time with optional offset
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use toml_native::{value, Value};
//!
//! let null = Value::Null;
//! let boolean = Value::from(true);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let obj = value!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(obj.is_map());
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use toml_native::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! let num: i64 = i64::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```

use crate::calendar::DATETIME_FIELD;
use crate::{Calendar, Datetime, KeyPath, Map};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed native value.
///
/// `Integer` and `Float` are distinct, as they are in TOML. `BigInt` and
/// `Bytes` exist so that host data with no TOML counterpart can be carried
/// to the encoder and rejected there with a precise diagnostic.
///
/// # Examples
///
/// ```rust
/// use toml_native::Value;
///
/// assert!(Value::Null.is_null());
/// assert!(Value::from(3).is_integer());
/// assert!(Value::from(3.0).is_float());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Calendar(Calendar),
    Seq(Vec<Value>),
    Map(Map),
    BigInt(BigInt),
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_calendar(&self) -> bool {
        matches!(self, Value::Calendar(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_seq(&self) -> bool {
        matches!(self, Value::Seq(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_native::Value;
    ///
    /// assert_eq!(Value::Bool(true).as_bool(), Some(true));
    /// assert_eq!(Value::from(42).as_bool(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is an integer, returns it. Floats are not converted.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// If the value is a float, returns it. Integers are not converted.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_calendar(&self) -> Option<&Calendar> {
        match self {
            Value::Calendar(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Calendar(Calendar::Date(d)) => Some(*d),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Calendar(Calendar::Time(t)) => Some(*t),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> Option<&Datetime> {
        match self {
            Value::Calendar(Calendar::DateTime(dt)) => Some(dt),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_seq(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Seq(seq) => Some(seq),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a map.
    ///
    /// ```rust
    /// let doc = toml_native::value!({ "a": { "b": 1 } });
    /// assert_eq!(doc.get("a").and_then(|a| a.get("b")), Some(&1.into()));
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// A short name for the value's kind, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Calendar(c) => c.type_name(),
            Value::Seq(_) => "sequence",
            Value::Map(_) => "map",
            Value::BigInt(_) => "big integer",
            Value::Bytes(_) => "bytes",
        }
    }
}

/// Printable representation, used verbatim in encode diagnostics.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{:?}", fl),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Calendar(c) => write!(f, "{}", c),
            Value::Seq(seq) => {
                f.write_str("[")?;
                for (i, v) in seq.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {} = {}", KeyPath::root().join_key(k), v)?;
                }
                f.write_str(if map.is_empty() { "}" } else { " }" })
            }
            Value::BigInt(bi) => write!(f, "{}", bi),
            Value::Bytes(bytes) => {
                f.write_str("b\"")?;
                for b in bytes {
                    write!(f, "{}", std::ascii::escape_default(*b))?;
                }
                f.write_str("\"")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::Error as _;

        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Calendar(c) => c
                .to_toml(&KeyPath::root())
                .map_err(S::Error::custom)?
                .serialize(serializer),
            Value::Seq(seq) => {
                use serde::ser::SerializeSeq;
                let mut out = serializer.serialize_seq(Some(seq.len()))?;
                for element in seq {
                    out.serialize_element(element)?;
                }
                out.end()
            }
            Value::Map(map) => map.serialize(serializer),
            Value::BigInt(bi) => match i128::try_from(bi) {
                Ok(i) => serializer.serialize_i128(i),
                Err(_) => serializer.serialize_str(&bi.to_string()),
            },
            Value::Bytes(bytes) => serializer.serialize_bytes(bytes),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Error as _, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any TOML-compatible value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Value, E> {
                Ok(Value::from(BigInt::from(value)))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Value, E> {
                Ok(Value::from(BigInt::from(value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Value, E> {
                Ok(Value::Bytes(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Value, E> {
                Ok(Value::Bytes(value))
            }

            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Seq(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::new();
                let Some(first) = map.next_key::<String>()? else {
                    return Ok(Value::Map(values));
                };
                // The `toml` deserializer hands datetimes over as a
                // single-entry map under a reserved key.
                if first == DATETIME_FIELD {
                    let raw: String = map.next_value()?;
                    if map.next_key::<String>()?.is_some() {
                        return Err(A::Error::custom(reserved_key()));
                    }
                    let parsed: toml::value::Datetime = raw.parse().map_err(A::Error::custom)?;
                    return Calendar::from_toml(&parsed)
                        .map(Value::Calendar)
                        .map_err(A::Error::custom);
                }
                values
                    .try_insert(first, map.next_value()?)
                    .map_err(A::Error::custom)?;
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    if key == DATETIME_FIELD {
                        return Err(A::Error::custom(reserved_key()));
                    }
                    values
                        .try_insert(key, value)
                        .map_err(A::Error::custom)?;
                }
                Ok(Value::Map(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

fn reserved_key() -> crate::Error {
    crate::Error::reserved_key(DATETIME_FIELD, &KeyPath::root())
}

// TryFrom implementations for extracting values from Value
impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Integer(i) => Ok(i),
            _ => Err(crate::Error::custom(format!(
                "expected integer, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Integer(i) => Ok(i as f64),
            _ => Err(crate::Error::custom(format!(
                "expected number, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected bool, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for Map {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Map(map) => Ok(map),
            _ => Err(crate::Error::custom(format!(
                "expected map, found {}",
                value.type_name()
            ))),
        }
    }
}

macro_rules! from_lossless_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(i64::from(value))
                }
            }
        )*
    };
}

from_lossless_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::BigInt(BigInt::from(value)),
        }
    }
}

/// Big integers that fit in `i64` become plain integers.
impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        match i64::try_from(&value) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::BigInt(value),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Seq(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Map(value)
    }
}

impl From<Calendar> for Value {
    fn from(value: Calendar) -> Self {
        Value::Calendar(value)
    }
}

impl From<Datetime> for Value {
    fn from(value: Datetime) -> Self {
        Value::Calendar(Calendar::DateTime(value))
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Calendar(Calendar::Date(value))
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Calendar(Calendar::Time(value))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Calendar(Calendar::DateTime(Datetime::local(value)))
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::Calendar(Calendar::DateTime(value.into()))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Calendar(Calendar::DateTime(value.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryfrom_i64() {
        assert_eq!(i64::try_from(Value::Integer(42)).unwrap(), 42);
        assert!(i64::try_from(Value::Float(42.0)).is_err());
        assert!(i64::try_from(Value::String("test".to_string())).is_err());
    }

    #[test]
    fn test_tryfrom_f64() {
        assert_eq!(f64::try_from(Value::Float(3.5)).unwrap(), 3.5);
        assert_eq!(f64::try_from(Value::Integer(42)).unwrap(), 42.0);
    }

    #[test]
    fn test_tryfrom_bool_and_string() {
        assert!(bool::try_from(Value::Bool(true)).unwrap());
        assert!(bool::try_from(Value::Integer(1)).is_err());
        assert_eq!(
            String::try_from(Value::from("hello")).unwrap(),
            "hello".to_string()
        );
    }

    #[test]
    fn test_large_integers_become_bigint() {
        assert_eq!(Value::from(u64::MAX).type_name(), "big integer");
        assert_eq!(Value::from(7u64), Value::Integer(7));
        assert_eq!(Value::from(BigInt::from(-5)), Value::Integer(-5));
    }

    #[test]
    fn test_integer_and_float_stay_distinct() {
        assert_ne!(Value::from(3), Value::from(3.0));
        assert_eq!(Value::from(3).as_f64(), None);
    }

    #[test]
    fn test_display() {
        let mut map = Map::new();
        map.insert("key with space".to_string(), Value::from(1.0));
        map.insert("list".to_string(), Value::Seq(vec![Value::from("a"), Value::Null]));
        assert_eq!(
            Value::Map(map).to_string(),
            r#"{ "key with space" = 1.0, list = ["a", null] }"#
        );
        assert_eq!(Value::Bytes(vec![0xde, b'a']).to_string(), r#"b"\xdea""#);
        assert_eq!(Value::Map(Map::new()).to_string(), "{}");
    }

    #[test]
    fn test_reserved_key_outside_datetime_rejected() {
        for other in ["a", "#a"] {
            let mut object = serde_json::Map::new();
            object.insert(other.to_string(), serde_json::Value::from(1));
            object.insert(
                "$__toml_private_datetime".to_string(),
                serde_json::Value::from("1979-05-27"),
            );
            let err = Value::deserialize(serde_json::Value::Object(object)).unwrap_err();
            assert!(err.to_string().contains("is reserved"), "{}", err);
        }
    }

    #[test]
    fn test_datetime_from_toml_deserializer() {
        let doc: Value = toml::from_str("d = 1979-05-27").unwrap();
        assert!(doc.get("d").and_then(Value::as_date).is_some());
    }

    #[test]
    fn test_calendar_accessors() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let value = Value::from(date);
        assert_eq!(value.as_date(), Some(date));
        assert_eq!(value.as_time(), None);
        assert_eq!(value.type_name(), "date");
    }
}
