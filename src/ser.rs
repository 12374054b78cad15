//! Serde serialization into native values.
//!
//! [`ValueSerializer`] turns any `T: Serialize` into a [`Value`]. It is the
//! first half of [`to_string`](crate::to_string): the resulting value is
//! then validated and emitted by the encoder.
//!
//! Host types that TOML cannot hold still serialize successfully here, so
//! that the encoder can reject them with the key path where they occur:
//!
//! - integers beyond `i64` become [`Value::BigInt`]
//! - byte slices become [`Value::Bytes`]
//!
//! Datetimes from the `toml` crate become [`Value::Calendar`]. Enums use the
//! externally tagged representation, so `E::V(1)` becomes `{ V = 1 }`.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Serialize;
//! use toml_native::{to_value, Value};
//!
//! #[derive(Serialize)]
//! struct Package { name: String, version: u64 }
//!
//! let value = to_value(&Package { name: "demo".into(), version: u64::MAX }).unwrap();
//! assert!(matches!(value.get("version"), Some(Value::BigInt(_))));
//! ```

use crate::calendar::DATETIME_FIELD;
use crate::{Calendar, Error, KeyPath, Map, Result, Value};
use num_bigint::BigInt;
use serde::{ser, Serialize};

/// Serializer whose output is a native [`Value`].
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: Map,
    current_key: Option<String>,
    datetime: Option<Calendar>,
}

pub struct SerializeStructVariant {
    variant: &'static str,
    map: Map,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::from(BigInt::from(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(Value::from(BigInt::from(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let inner = to_value(value).map_err(|e| e.within_key(variant))?;
        let mut map = Map::with_capacity(1);
        map.insert(variant.to_string(), inner);
        Ok(Value::Map(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: Map::new(),
        })
    }
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let index = self.vec.len();
        self.vec
            .push(to_value(value).map_err(|e| e.within_index(index))?);
        Ok(())
    }
}

impl SerializeMap {
    fn new() -> Self {
        SerializeMap {
            map: Map::new(),
            current_key: None,
            datetime: None,
        }
    }

    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<()> {
        if key == DATETIME_FIELD || self.datetime.is_some() {
            return Err(Error::reserved_key(DATETIME_FIELD, &KeyPath::root()));
        }
        let value = to_value(value).map_err(|e| e.within_key(&key))?;
        self.map.try_insert(key, value)
    }

    fn finish(self) -> Value {
        match self.datetime {
            Some(calendar) => Value::Calendar(calendar),
            None => Value::Map(self.map),
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Seq(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Seq(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Seq(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let index = self.vec.len();
        let value = to_value(value).map_err(|e| e.within_index(index).within_key(self.variant))?;
        self.vec.push(value);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut map = Map::with_capacity(1);
        map.insert(self.variant.to_string(), Value::Seq(self.vec));
        Ok(Value::Map(map))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if key == DATETIME_FIELD && self.map.is_empty() && self.datetime.is_none() {
            self.datetime = Some(datetime_from_field(value)?);
            return Ok(());
        }
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = to_value(value).map_err(|e| e.within_key(key).within_key(self.variant))?;
        self.map
            .try_insert(key.to_string(), value)
            .map_err(|e| e.within_key(self.variant))
    }

    fn end(self) -> Result<Value> {
        let mut map = Map::with_capacity(1);
        map.insert(self.variant.to_string(), Value::Map(self.map));
        Ok(Value::Map(map))
    }
}

/// `toml` datetimes serialize as a struct with one reserved field holding
/// the RFC 3339 text.
fn datetime_from_field<T: ?Sized + Serialize>(value: &T) -> Result<Calendar> {
    match to_value(value)? {
        Value::String(raw) => {
            let parsed: toml::value::Datetime = raw.parse().map_err(Error::custom)?;
            Calendar::from_toml(&parsed)
        }
        other => Err(Error::custom(format!(
            "expected datetime text, found {}",
            other.type_name()
        ))),
    }
}

/// Accepts string-like keys only. Numbers, booleans and other values are
/// key errors rather than being stringified.
struct MapKeySerializer;

fn key_error(repr: &str) -> Error {
    Error::invalid_key(repr, &KeyPath::root())
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = ser::Impossible<String, Error>;
    type SerializeTuple = ser::Impossible<String, Error>;
    type SerializeTupleStruct = ser::Impossible<String, Error>;
    type SerializeTupleVariant = ser::Impossible<String, Error>;
    type SerializeMap = ser::Impossible<String, Error>;
    type SerializeStruct = ser::Impossible<String, Error>;
    type SerializeStructVariant = ser::Impossible<String, Error>;

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, v: bool) -> Result<String> {
        Err(key_error(&v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Err(key_error(&v.to_string()))
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Err(key_error(&v.to_string()))
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Err(key_error(&v.to_string()))
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Err(key_error(&v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Err(key_error(&v.to_string()))
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Err(key_error(&v.to_string()))
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Err(key_error(&v.to_string()))
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Err(key_error(&v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<String> {
        Err(key_error(&format!("{:?}", v)))
    }

    fn serialize_f64(self, v: f64) -> Result<String> {
        Err(key_error(&format!("{:?}", v)))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<String> {
        Err(key_error(&Value::Bytes(v.to_vec()).to_string()))
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_error("null"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_error("()"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<String> {
        Err(key_error(name))
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(key_error(variant))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_error("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_error("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_error(name))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_error(variant))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_error("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_error(name))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_error(variant))
    }
}

/// Serializes any `T: Serialize` into a native [`Value`].
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[test]
    fn test_struct_to_map() {
        #[derive(Serialize)]
        struct Server {
            host: String,
            port: u16,
            tags: Vec<&'static str>,
        }

        let value = to_value(&Server {
            host: "localhost".to_string(),
            port: 8080,
            tags: vec!["a"],
        })
        .unwrap();
        assert_eq!(value.get("host"), Some(&Value::from("localhost")));
        assert_eq!(value.get("port"), Some(&Value::Integer(8080)));
        assert_eq!(value.get("tags"), Some(&Value::Seq(vec![Value::from("a")])));
    }

    #[test]
    fn test_wide_integers() {
        assert_eq!(to_value(&7u128).unwrap(), Value::Integer(7));
        assert!(matches!(to_value(&u64::MAX).unwrap(), Value::BigInt(_)));
        assert!(matches!(to_value(&i128::MIN).unwrap(), Value::BigInt(_)));
    }

    #[test]
    fn test_bytes() {
        let value = to_value(&serde_bytes_like(&[1, 2])).unwrap();
        assert_eq!(value, Value::Bytes(vec![1, 2]));
    }

    fn serde_bytes_like(bytes: &[u8]) -> impl Serialize + '_ {
        struct Raw<'a>(&'a [u8]);
        impl Serialize for Raw<'_> {
            fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.serialize_bytes(self.0)
            }
        }
        Raw(bytes)
    }

    #[test]
    fn test_non_string_keys_rejected() {
        let mut map = BTreeMap::new();
        map.insert(1, "one");
        let err = to_value(&map).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Key);
        assert!(err.to_string().contains("map key 1"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        struct Twice;
        impl Serialize for Twice {
            fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                use serde::ser::SerializeMap;
                let mut map = s.serialize_map(Some(2))?;
                map.serialize_entry("k", &1)?;
                map.serialize_entry("k", &2)?;
                map.end()
            }
        }

        let mut outer = BTreeMap::new();
        outer.insert("inner", Twice);
        let err = to_value(&outer).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Key);
        assert_eq!(err.to_string(), "duplicate key `k` in table at inner");
    }

    #[test]
    fn test_toml_datetime_becomes_calendar() {
        let dt: toml::value::Datetime = "1979-05-27T07:32:00Z".parse().unwrap();
        let value = to_value(&dt).unwrap();
        let datetime = value.as_datetime().unwrap();
        assert_eq!(datetime.offset_minutes(), Some(0));

        let date: toml::value::Datetime = "1979-05-27".parse().unwrap();
        assert!(to_value(&date).unwrap().as_date().is_some());
    }

    #[test]
    fn test_reserved_key_in_map_rejected() {
        let mut map = BTreeMap::new();
        map.insert("$__toml_private_datetime", "1979-05-27");
        let mut outer = BTreeMap::new();
        outer.insert("t", map);
        let err = to_value(&outer).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Key);
        assert_eq!(
            err.to_string(),
            "key `$__toml_private_datetime` in table at t is reserved"
        );
    }

    #[test]
    fn test_enum_representation() {
        #[derive(Serialize)]
        enum Shape {
            Unit,
            Circle(f64),
            Point(i32, i32),
            Rect { w: u8, h: u8 },
        }

        assert_eq!(to_value(&Shape::Unit).unwrap(), Value::from("Unit"));
        assert_eq!(
            to_value(&Shape::Circle(1.5)).unwrap().get("Circle"),
            Some(&Value::Float(1.5))
        );
        assert_eq!(
            to_value(&Shape::Point(1, 2)).unwrap().get("Point"),
            Some(&Value::Seq(vec![Value::Integer(1), Value::Integer(2)]))
        );
        let rect = to_value(&Shape::Rect { w: 3, h: 4 }).unwrap();
        assert_eq!(rect.get("Rect").and_then(|r| r.get("h")), Some(&Value::Integer(4)));
    }

    #[test]
    fn test_option_fields_become_null() {
        #[derive(Serialize)]
        struct Config {
            name: Option<String>,
        }
        let value = to_value(&Config { name: None }).unwrap();
        assert_eq!(value.get("name"), Some(&Value::Null));
    }
}
