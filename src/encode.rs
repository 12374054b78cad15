//! Native value to document tree conversion.
//!
//! The [`Encoder`] validates a native [`Value`] and builds the equivalent
//! [`toml::Table`]. Rejections name the offending value and the
//! [`KeyPath`] where it was found. Nothing is returned on failure.
//!
//! ```rust
//! use toml_native::encode::Encoder;
//! use toml_native::value;
//!
//! let doc = value!({ "server": { "port": 8080 } });
//! let table = Encoder::default().encode_root(&doc).unwrap();
//! assert_eq!(table["server"]["port"].as_integer(), Some(8080));
//! ```

use crate::calendar::DATETIME_FIELD;
use crate::options::DEFAULT_MAX_DEPTH;
use crate::{Calendar, Error, KeyPath, Map, Options, Result, Value};
use tracing::trace;

/// Converts native values into document trees.
#[derive(Debug)]
pub struct Encoder {
    max_depth: usize,
    skip_nulls: bool,
    path: KeyPath,
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder {
            max_depth: DEFAULT_MAX_DEPTH,
            skip_nulls: true,
            path: KeyPath::root(),
        }
    }
}

impl Encoder {
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Encoder {
            max_depth: options.max_depth,
            skip_nulls: options.skip_nulls,
            path: KeyPath::root(),
        }
    }

    /// Encodes a document root, which must be a map.
    pub fn encode_root(&mut self, value: &Value) -> Result<toml::Table> {
        match value {
            Value::Map(map) => self.encode_table(map),
            other => Err(Error::unsupported_type_because(
                &other.to_string(),
                &KeyPath::root(),
                "a TOML document must be a table",
            )),
        }
    }

    /// Encodes a root table.
    pub fn encode_table(&mut self, map: &Map) -> Result<toml::Table> {
        self.path = KeyPath::root();
        self.encode_entries(map)
    }

    /// Encodes one value found at the encoder's current path.
    ///
    /// Types are tested in a fixed order. Full date-times are matched before
    /// bare dates and times.
    pub fn encode_value(&mut self, value: &Value) -> Result<toml::Value> {
        match value {
            Value::Bool(b) => Ok(toml::Value::Boolean(*b)),
            Value::Integer(i) => Ok(toml::Value::Integer(*i)),
            Value::Float(f) => Ok(toml::Value::Float(*f)),
            Value::String(s) => Ok(toml::Value::String(s.clone())),
            Value::Map(map) => {
                self.check_depth()?;
                self.encode_entries(map).map(toml::Value::Table)
            }
            Value::Seq(seq) => {
                self.check_depth()?;
                let mut array = Vec::with_capacity(seq.len());
                for (index, element) in seq.iter().enumerate() {
                    self.path.push_index(index);
                    let encoded = self.encode_value(element);
                    self.path.pop();
                    array.push(encoded?);
                }
                Ok(toml::Value::Array(array))
            }
            Value::Calendar(datetime @ Calendar::DateTime(_)) => self.encode_calendar(datetime),
            Value::Calendar(date @ Calendar::Date(_)) => self.encode_calendar(date),
            Value::Calendar(time @ Calendar::Time(_)) => self.encode_calendar(time),
            Value::Null => Err(Error::unsupported_type_because(
                "null",
                &self.path,
                "TOML has no null value",
            )),
            Value::BigInt(bi) => Err(Error::unsupported_type_because(
                &bi.to_string(),
                &self.path,
                "TOML integers are limited to 64 bits",
            )),
            Value::Bytes(_) => Err(Error::unsupported_type_because(
                &value.to_string(),
                &self.path,
                "TOML has no binary type",
            )),
        }
    }

    fn encode_calendar(&self, calendar: &Calendar) -> Result<toml::Value> {
        calendar.to_toml(&self.path).map(toml::Value::Datetime)
    }

    fn encode_entries(&mut self, map: &Map) -> Result<toml::Table> {
        trace!(path = %self.path, entries = map.len(), "encoding table");
        let mut table = toml::Table::new();
        for (key, value) in map {
            if value.is_null() && self.skip_nulls {
                trace!(path = %self.path, key = %key, "skipping null entry");
                continue;
            }
            if key == DATETIME_FIELD {
                return Err(Error::reserved_key(key, &self.path));
            }
            self.path.push_key(key);
            let encoded = self.encode_value(value);
            self.path.pop();
            table.insert(key.clone(), encoded?);
        }
        Ok(table)
    }

    fn check_depth(&self) -> Result<()> {
        if self.path.len() > self.max_depth {
            return Err(Error::depth_limit(self.max_depth, &self.path));
        }
        Ok(())
    }
}
