//! Serde deserialization out of native values.
//!
//! [`ValueDeserializer`] lets any `T: Deserialize` be built from a decoded
//! [`Value`]. It backs [`from_str`](crate::from_str) and
//! [`from_value`](crate::from_value).
//!
//! Calendar values are handed to the target as ISO 8601 text, which is the
//! format `chrono` types deserialize from:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use serde::Deserialize;
//! use toml_native::from_str;
//!
//! #[derive(Deserialize)]
//! struct Release { version: String, date: NaiveDate }
//!
//! let release: Release = from_str("version = \"1.0\"\ndate = 2024-03-01").unwrap();
//! assert_eq!(release.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
//! ```

use crate::{Error, Map, Result, Value};
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};

type StringDeserializer = de::value::StringDeserializer<Error>;

/// Deserializer that reads from an owned [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Calendar(c) => visitor.visit_string(c.to_string()),
            Value::Seq(seq) => visitor.visit_seq(SeqDeserializer::new(seq)),
            Value::Map(map) => visitor.visit_map(MapDeserializer::new(map)),
            Value::BigInt(bi) => match i128::try_from(&bi) {
                Ok(i) => visitor.visit_i128(i),
                Err(_) => visitor.visit_string(bi.to_string()),
            },
            Value::Bytes(bytes) => visitor.visit_byte_buf(bytes),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            value => visitor.visit_some(ValueDeserializer::new(value)),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer::new(variant, None)),
            Value::Map(map) if map.len() == 1 => {
                let (variant, value) = map
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::custom("expected a single-key table for enum"))?;
                visitor.visit_enum(EnumDeserializer::new(variant, Some(value)))
            }
            other => Err(Error::custom(format!(
                "expected a string or single-key table for enum, found {}",
                other.type_name()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer::new(self)
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: Map) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(StringDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl EnumDeserializer {
    fn new(variant: String, value: Option<Value>) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(StringDeserializer::new(self.variant))?;
        let visitor = VariantDeserializer { value: self.value };
        Ok((variant, visitor))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            Some(other) => Err(Error::custom(format!(
                "expected unit variant, found {}",
                other.type_name()
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Seq(seq)) => visitor.visit_seq(SeqDeserializer::new(seq)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Map(map)) => visitor.visit_map(MapDeserializer::new(map)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}

/// Deserializes a `T` out of a native [`Value`].
pub fn from_value<T: de::DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(ValueDeserializer::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;
    use chrono::{DateTime, FixedOffset, NaiveTime};
    use serde::Deserialize;

    #[test]
    fn test_struct_from_map() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Owner {
            name: String,
            age: Option<u8>,
            nick: Option<String>,
        }

        let owner: Owner = from_value(value!({ "name": "Tom", "age": 42 })).unwrap();
        assert_eq!(
            owner,
            Owner {
                name: "Tom".to_string(),
                age: Some(42),
                nick: None,
            }
        );
    }

    #[test]
    fn test_calendar_into_chrono() {
        let raw: toml::Table =
            toml::from_str("at = 1979-05-27T07:32:00-07:00\nlt = 07:32:00.5").unwrap();
        let map = crate::decode::Decoder::default().decode_table(raw).unwrap();

        #[derive(Deserialize)]
        struct Times {
            at: DateTime<FixedOffset>,
            lt: NaiveTime,
        }

        let times: Times = from_value(Value::Map(map)).unwrap();
        assert_eq!(times.at.offset().local_minus_utc(), -7 * 3600);
        assert_eq!(times.lt, NaiveTime::from_hms_milli_opt(7, 32, 0, 500).unwrap());
    }

    #[test]
    fn test_enums() {
        #[derive(Deserialize, Debug, PartialEq)]
        enum Mode {
            Fast,
            Limit(u32),
            Window { start: u8, end: u8 },
        }

        assert_eq!(from_value::<Mode>(value!("Fast")).unwrap(), Mode::Fast);
        assert_eq!(
            from_value::<Mode>(value!({ "Limit": 5 })).unwrap(),
            Mode::Limit(5)
        );
        assert_eq!(
            from_value::<Mode>(value!({ "Window": { "start": 1, "end": 2 } })).unwrap(),
            Mode::Window { start: 1, end: 2 }
        );
        assert!(from_value::<Mode>(value!(3)).is_err());
    }

    #[test]
    fn test_type_mismatch_is_custom_error() {
        let err = from_value::<u8>(value!("nope")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Custom);
    }
}
