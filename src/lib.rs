//! # toml_native
//!
//! Conversion between TOML documents and a dynamic native value model.
//!
//! ## What it does
//!
//! [`loads`] parses TOML text and projects the document into a [`Map`] of
//! native [`Value`]s: nested maps and sequences over booleans, integers,
//! floats, strings and calendar values. [`dumps`] goes the other way,
//! validating a native map and emitting TOML text.
//!
//! Parsing and emission are delegated to the [`toml`] crate. This crate owns
//! the two conversion walks and their diagnostics:
//!
//! - **Syntax errors** carry a 1-based line/column span and, for files, the path
//! - **Encode errors** name the offending value and its [`KeyPath`]
//! - **Depth limits** bound recursion in both directions
//!
//! ## Quick Start
//!
//! ```rust
//! use toml_native::{dumps, loads, Value};
//!
//! let doc = loads("title = \"TOML Example\"\n\n[owner]\nname = \"Tom\"\n").unwrap();
//! assert_eq!(doc.get("title").and_then(Value::as_str), Some("TOML Example"));
//!
//! let text = dumps(&Value::Map(doc)).unwrap();
//! assert!(text.contains("[owner]"));
//! ```
//!
//! ### Typed data through serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use toml_native::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! let server = Server { host: "localhost".to_string(), port: 8080 };
//! let text = to_string(&server).unwrap();
//! assert_eq!(text, "host = \"localhost\"\nport = 8080\n");
//! assert_eq!(from_str::<Server>(&text).unwrap(), server);
//! ```
//!
//! ### Dynamic Values with the value! Macro
//!
//! ```rust
//! use toml_native::{dumps, value, ErrorKind, Value};
//!
//! let doc = value!({
//!     "name": "demo",
//!     "blob": (Value::Bytes(vec![0, 1]))
//! });
//! let err = dumps(&doc).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Schema);
//! assert!(err.to_string().contains("blob"));
//! ```
//!
//! ## Type mapping
//!
//! | TOML | native |
//! |---|---|
//! | table | [`Value::Map`] (document order) |
//! | array | [`Value::Seq`] |
//! | integer / float | [`Value::Integer`] / [`Value::Float`] |
//! | string / boolean | [`Value::String`] / [`Value::Bool`] |
//! | offset or local date-time | [`Calendar::DateTime`] |
//! | local date / local time | [`Calendar::Date`] / [`Calendar::Time`] |
//!
//! Calendar values hold microseconds; finer digits are truncated.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - loading and dumping a document
//! - **`dynamic_values.rs`** - building and inspecting values, profiling
//!
//! Run any example with: `cargo run --example <name>`

pub mod calendar;
pub mod de;
pub mod decode;
pub mod encode;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod path;
pub mod profile;
pub mod ser;
pub mod value;

pub use calendar::{Calendar, Datetime};
pub use de::{from_value, ValueDeserializer};
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{Error, ErrorKind, Position, Result, Span};
pub use map::Map;
pub use options::Options;
pub use path::KeyPath;
pub use ser::{to_value, ValueSerializer};
pub use value::Value;

use profile::{Collector, Scope};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::Path;
use tracing::debug;

/// Parses a TOML document into a native map.
///
/// # Examples
///
/// ```rust
/// use toml_native::{loads, Value};
///
/// let doc = loads("a = 3\nb = 3.0").unwrap();
/// assert_eq!(doc.get("a"), Some(&Value::Integer(3)));
/// assert_eq!(doc.get("b"), Some(&Value::Float(3.0)));
/// ```
///
/// # Errors
///
/// Returns a syntax error with the failing span if the text is not valid
/// TOML, or a depth error if it nests deeper than the default limit.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn loads(text: &str) -> Result<Map> {
    loads_with(text, &Options::default(), &mut ())
}

/// Parses a TOML document with custom options.
///
/// # Errors
///
/// See [`loads`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn loads_with_options(text: &str, options: &Options) -> Result<Map> {
    loads_with(text, options, &mut ())
}

/// Parses a TOML document, reporting phase timings to `collector`.
///
/// # Errors
///
/// See [`loads`].
pub fn loads_with<C>(text: &str, options: &Options, collector: &mut C) -> Result<Map>
where
    C: Collector + ?Sized,
{
    debug!(bytes = text.len(), "loads");
    let result = profile::timed(collector, Scope::LoadsTotal, |collector| {
        let table = profile::timed(collector, Scope::LoadsParse, |_| parse(text, options))?;
        profile::timed(collector, Scope::LoadsConvert, |_| {
            Decoder::new(options).decode_table(table)
        })
    });
    match &result {
        Ok(map) => debug!(entries = map.len(), "loads finished"),
        Err(err) => debug!(error = %err, "loads rejected input"),
    }
    result
}

fn parse(text: &str, options: &Options) -> Result<toml::Table> {
    toml::from_str::<toml::Table>(text)
        .map_err(|err| Error::from_parse(&err, text, options.source_path.as_deref()))
}

/// Converts a native map into TOML text.
///
/// # Examples
///
/// ```rust
/// use toml_native::{dumps, value};
///
/// let text = dumps(&value!({ "a": [1, 2] })).unwrap();
/// assert_eq!(text, "a = [1, 2]\n");
/// ```
///
/// # Errors
///
/// Returns a schema error if the root is not a map or any value has no TOML
/// representation, a key error for duplicate keys and a depth error past the
/// nesting limit. No text is produced on error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dumps(value: &Value) -> Result<String> {
    dumps_with(value, &Options::default(), &mut ())
}

/// Converts a native map into TOML text with custom options.
///
/// # Errors
///
/// See [`dumps`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dumps_with_options(value: &Value, options: &Options) -> Result<String> {
    dumps_with(value, options, &mut ())
}

/// Converts a native map into TOML text, reporting phase timings to
/// `collector`.
///
/// # Errors
///
/// See [`dumps`].
pub fn dumps_with<C>(value: &Value, options: &Options, collector: &mut C) -> Result<String>
where
    C: Collector + ?Sized,
{
    debug!(kind = value.type_name(), "dumps");
    let result = profile::timed(collector, Scope::DumpsTotal, |collector| {
        let table = profile::timed(collector, Scope::DumpsConvert, |_| {
            Encoder::new(options).encode_root(value)
        })?;
        profile::timed(collector, Scope::DumpsEmit, |_| {
            toml::to_string(&table).map_err(Error::internal)
        })
    });
    match &result {
        Ok(text) => debug!(bytes = text.len(), "dumps finished"),
        Err(err) => debug!(error = %err, "dumps rejected value"),
    }
    result
}

/// Serializes any `T: Serialize` to TOML text.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use toml_native::to_string;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: 2 }).unwrap(), "x = 1\ny = 2\n");
/// ```
///
/// # Errors
///
/// Returns an error if `T` does not serialize to a table or contains a value
/// TOML cannot represent.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    dumps(&to_value(value)?)
}

/// Deserializes an instance of type `T` from TOML text.
///
/// # Errors
///
/// Returns a syntax error for malformed text, or a custom error if the
/// document does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(Value::Map(loads(text)?))
}

/// Reads a whole TOML document from a reader.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
/// use toml_native::load;
///
/// let doc = load(Cursor::new(b"x = 1")).unwrap();
/// assert_eq!(doc.len(), 1);
/// ```
///
/// # Errors
///
/// Returns an I/O error if reading fails, otherwise see [`loads`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn load<R>(mut reader: R) -> Result<Map>
where
    R: io::Read,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(&e.to_string()))?;
    loads(&text)
}

/// Reads and parses the TOML file at `path`. Syntax errors name the file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, otherwise see [`loads`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn load_file<P>(path: P) -> Result<Map>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::io(&format!("{}: {}", path.display(), e)))?;
    loads_with_options(&text, &Options::new().with_source_path(path))
}

/// Writes a native map to `writer` as TOML text.
///
/// Nothing is written if the value is rejected.
///
/// # Errors
///
/// Returns an I/O error if writing fails, otherwise see [`dumps`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dump<W>(value: &Value, mut writer: W) -> Result<()>
where
    W: io::Write,
{
    let text = dumps(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}
