//! Document tree to native value projection.
//!
//! The [`Decoder`] walks a parsed [`toml::Table`] top-down in one pass and
//! builds the equivalent native [`Map`]. Most callers want
//! [`loads`](crate::loads), which parses and decodes in one step; the
//! decoder is exposed for code that already holds a document tree.
//!
//! ```rust
//! use toml_native::decode::Decoder;
//! use toml_native::Value;
//!
//! let table: toml::Table = toml::from_str("ports = [80, 443]").unwrap();
//! let map = Decoder::default().decode_table(table).unwrap();
//! assert_eq!(
//!     map.get("ports"),
//!     Some(&Value::Seq(vec![Value::from(80), Value::from(443)]))
//! );
//! ```

use crate::options::DEFAULT_MAX_DEPTH;
use crate::{Calendar, Error, KeyPath, Map, Options, Result, Value};
use tracing::trace;

/// Converts document trees into native values.
///
/// A decoder tracks the key path of the node it is visiting so that depth
/// errors can name where the limit was hit. It can be reused for several
/// documents.
#[derive(Debug)]
pub struct Decoder {
    max_depth: usize,
    path: KeyPath,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder {
            max_depth: DEFAULT_MAX_DEPTH,
            path: KeyPath::root(),
        }
    }
}

impl Decoder {
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Decoder {
            max_depth: options.max_depth,
            path: KeyPath::root(),
        }
    }

    /// Decodes a root table. Entries keep their document order.
    pub fn decode_table(&mut self, table: toml::Table) -> Result<Map> {
        self.path = KeyPath::root();
        self.decode_entries(table)
    }

    /// Decodes a single node found at the decoder's current path.
    pub fn decode_value(&mut self, value: toml::Value) -> Result<Value> {
        match value {
            toml::Value::String(s) => Ok(Value::String(s)),
            toml::Value::Integer(i) => Ok(Value::Integer(i)),
            toml::Value::Float(f) => Ok(Value::Float(f)),
            toml::Value::Boolean(b) => Ok(Value::Bool(b)),
            toml::Value::Datetime(dt) => Calendar::from_toml(&dt).map(Value::Calendar),
            toml::Value::Array(items) => {
                self.check_depth()?;
                let mut seq = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    self.path.push_index(index);
                    let decoded = self.decode_value(item);
                    self.path.pop();
                    seq.push(decoded?);
                }
                Ok(Value::Seq(seq))
            }
            toml::Value::Table(table) => {
                self.check_depth()?;
                self.decode_entries(table).map(Value::Map)
            }
        }
    }

    fn decode_entries(&mut self, table: toml::Table) -> Result<Map> {
        trace!(path = %self.path, entries = table.len(), "decoding table");
        let mut map = Map::with_capacity(table.len());
        for (key, node) in table {
            self.path.push_key(&key);
            let decoded = self.decode_value(node);
            self.path.pop();
            map.insert(key, decoded?);
        }
        Ok(map)
    }

    fn check_depth(&self) -> Result<()> {
        if self.path.len() > self.max_depth {
            return Err(Error::depth_limit(self.max_depth, &self.path));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Datetime, ErrorKind};
    use chrono::{FixedOffset, NaiveDate, NaiveTime};

    fn decode(text: &str) -> Result<Map> {
        let table: toml::Table = toml::from_str(text).unwrap();
        Decoder::default().decode_table(table)
    }

    #[test]
    fn test_scalars() {
        let map = decode("i = 3\nf = 3.0\ns = \"x\"\nb = false").unwrap();
        assert_eq!(map.get("i"), Some(&Value::Integer(3)));
        assert_eq!(map.get("f"), Some(&Value::Float(3.0)));
        assert_eq!(map.get("s"), Some(&Value::from("x")));
        assert_eq!(map.get("b"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_document_order() {
        let map = decode("zeta = 1\nalpha = 2\n[mid]\nx = 3").unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_mixed_array_order() {
        let map = decode("a = [1, \"two\", 3.0, true]").unwrap();
        assert_eq!(
            map.get("a"),
            Some(&Value::Seq(vec![
                Value::Integer(1),
                Value::from("two"),
                Value::Float(3.0),
                Value::Bool(true),
            ]))
        );
    }

    #[test]
    fn test_calendar_shapes() {
        let map = decode(
            "odt = 1979-05-27T07:32:00-07:00\n\
             ldt = 1979-05-27T07:32:00\n\
             ld = 1979-05-27\n\
             lt = 00:32:00.999999999\n\
             utc = 1979-05-27T07:32:00Z",
        )
        .unwrap();
        let naive = NaiveDate::from_ymd_opt(1979, 5, 27)
            .unwrap()
            .and_hms_opt(7, 32, 0)
            .unwrap();

        let odt = map.get("odt").and_then(Value::as_datetime).unwrap();
        assert_eq!(odt.naive, naive);
        assert_eq!(odt.offset_minutes(), Some(-420));

        assert_eq!(
            map.get("ldt").and_then(Value::as_datetime),
            Some(&Datetime::local(naive))
        );
        assert_eq!(
            map.get("ld").and_then(Value::as_date),
            NaiveDate::from_ymd_opt(1979, 5, 27)
        );
        assert_eq!(
            map.get("lt").and_then(Value::as_time),
            NaiveTime::from_hms_micro_opt(0, 32, 0, 999_999)
        );
        assert_eq!(
            map.get("utc").and_then(Value::as_datetime).and_then(|dt| dt.offset),
            FixedOffset::east_opt(0)
        );
    }

    #[test]
    fn test_depth_limit() {
        let table: toml::Table = toml::from_str("a.b.c.d.e = 1").unwrap();
        let options = Options::new().with_max_depth(3);
        let err = Decoder::new(&options).decode_table(table).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Depth);
        assert!(err.to_string().contains("a.b.c.d"));

        let table: toml::Table = toml::from_str("a.b.c = 1").unwrap();
        assert!(Decoder::new(&options).decode_table(table).is_ok());
    }

    #[test]
    fn test_arrays_count_towards_depth() {
        let table: toml::Table = toml::from_str("a = [[[1]]]").unwrap();
        let options = Options::new().with_max_depth(2);
        let err = Decoder::new(&options).decode_table(table).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Depth);
        assert!(err.to_string().contains("a[0][0]"));
    }

    #[test]
    fn test_unrecognized_datetime_is_internal() {
        let mut table = toml::Table::new();
        table.insert(
            "when".to_string(),
            toml::Value::Datetime(toml::value::Datetime {
                date: None,
                time: None,
                offset: None,
            }),
        );
        let err = Decoder::default().decode_table(table).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_decoder_is_reusable() {
        let mut decoder = Decoder::default();
        let first: toml::Table = toml::from_str("[x]\ny = 1").unwrap();
        let second: toml::Table = toml::from_str("z = 2").unwrap();
        decoder.decode_table(first).unwrap();
        let map = decoder.decode_table(second).unwrap();
        assert_eq!(map.get("z"), Some(&Value::Integer(2)));
    }
}
