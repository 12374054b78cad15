//! Error types for TOML decoding and encoding.
//!
//! A single [`Error`] type covers both directions:
//!
//! - **Syntax errors**: malformed TOML text, with a 1-based line/column [`Span`]
//!   and the originating file path when known
//! - **Schema errors**: a native value with no TOML representation
//! - **Key errors**: a map key that is not a string, or a key that would be
//!   inserted twice into the same table
//! - **Depth errors**: nesting deeper than [`Options::max_depth`](crate::Options)
//! - **Internal errors**: the document tree contained a shape the decoder does
//!   not know about, which means the parser and this crate disagree
//!
//! Use [`Error::kind`] to tell the categories apart.
//!
//! ## Examples
//!
//! ```rust
//! use toml_native::{loads, ErrorKind};
//!
//! let err = loads("name = \"unterminated").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Syntax);
//! assert_eq!(err.span().unwrap().start.line, 1);
//! ```

use crate::KeyPath;
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A 1-based line and column in TOML source text. Columns count characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Resolves a byte offset into `text` to a line/column position.
    ///
    /// Offsets past the end clamp to the end of input; offsets inside a
    /// multi-byte character snap back to its first byte.
    #[must_use]
    pub fn at_offset(text: &str, offset: usize) -> Self {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &text[..offset];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        Position {
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The region of source text a syntax error refers to. `end` is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Converts a parser byte range into a line/column span. A missing range
    /// points at the end of input.
    #[must_use]
    pub fn from_byte_range(text: &str, range: Option<Range<usize>>) -> Self {
        let range = range.unwrap_or(text.len()..text.len());
        Span {
            start: Position::at_offset(text, range.start),
            end: Position::at_offset(text, range.end.max(range.start)),
        }
    }
}

/// The category of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Schema,
    Key,
    Depth,
    Internal,
    Io,
    Custom,
}

/// Represents all possible errors that can occur while converting between
/// TOML and native values.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed TOML text
    #[error("TOML syntax error at {}{}: {message}", .span.start, display_path(.path))]
    Syntax {
        message: String,
        span: Span,
        path: Option<PathBuf>,
    },

    /// A native value with no TOML counterpart
    #[error("cannot convert value {value} at {at} to a TOML type{detail}")]
    UnsupportedType {
        value: String,
        at: KeyPath,
        detail: String,
    },

    /// A key that would appear twice in one table
    #[error("duplicate key `{key}` in table at {at}")]
    DuplicateKey { key: String, at: KeyPath },

    /// A map key that is not a string
    #[error("map key {key} in table at {at} must be a string")]
    InvalidKey { key: String, at: KeyPath },

    /// A key the `toml` crate reserves for carrying datetimes
    #[error("key `{key}` in table at {at} is reserved")]
    ReservedKey { key: String, at: KeyPath },

    /// Nesting deeper than the configured limit
    #[error("nesting at {at} exceeds the maximum depth of {limit}")]
    DepthLimit { limit: usize, at: KeyPath },

    /// A document-tree shape this crate does not understand
    #[error("internal error: {0}")]
    Internal(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error raised through serde
    #[error("{0}")]
    Custom(String),
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

impl Error {
    /// Creates a syntax error from a message and span.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_native::{Error, Position, Span};
    ///
    /// let at = Position { line: 3, column: 12 };
    /// let err = Error::syntax("unterminated string", Span { start: at, end: at }, None);
    /// assert!(err.to_string().contains("line 3, column 12"));
    /// ```
    pub fn syntax(message: &str, span: Span, path: Option<&Path>) -> Self {
        Error::Syntax {
            message: message.to_string(),
            span,
            path: path.map(Path::to_path_buf),
        }
    }

    /// Wraps a parser error, resolving its byte span against `text`.
    pub fn from_parse(err: &toml::de::Error, text: &str, path: Option<&Path>) -> Self {
        Error::syntax(
            err.message().trim_end(),
            Span::from_byte_range(text, err.span()),
            path,
        )
    }

    /// Creates an unsupported-type error for `value` found at `at`.
    pub fn unsupported_type(value: &str, at: &KeyPath) -> Self {
        Error::UnsupportedType {
            value: value.to_string(),
            at: at.clone(),
            detail: String::new(),
        }
    }

    /// Like [`Error::unsupported_type`] with an explanation appended.
    pub fn unsupported_type_because(value: &str, at: &KeyPath, detail: &str) -> Self {
        Error::UnsupportedType {
            value: value.to_string(),
            at: at.clone(),
            detail: format!(": {}", detail),
        }
    }

    pub fn duplicate_key(key: &str, at: &KeyPath) -> Self {
        Error::DuplicateKey {
            key: key.to_string(),
            at: at.clone(),
        }
    }

    /// Creates an error for a non-string map key, given its printable form.
    pub fn invalid_key(key: &str, at: &KeyPath) -> Self {
        Error::InvalidKey {
            key: key.to_string(),
            at: at.clone(),
        }
    }

    pub fn reserved_key(key: &str, at: &KeyPath) -> Self {
        Error::ReservedKey {
            key: key.to_string(),
            at: at.clone(),
        }
    }

    pub fn depth_limit(limit: usize, at: &KeyPath) -> Self {
        Error::DepthLimit {
            limit,
            at: at.clone(),
        }
    }

    /// Creates an internal error. These indicate a bug or a version mismatch
    /// between this crate and the `toml` crate, never bad user input.
    pub fn internal<T: fmt::Display>(msg: T) -> Self {
        let msg = msg.to_string();
        tracing::error!(error = %msg, "internal conversion error");
        Error::Internal(msg)
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_native::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::UnsupportedType { .. } => ErrorKind::Schema,
            Error::DuplicateKey { .. }
            | Error::InvalidKey { .. }
            | Error::ReservedKey { .. } => ErrorKind::Key,
            Error::DepthLimit { .. } => ErrorKind::Depth,
            Error::Internal(_) => ErrorKind::Internal,
            Error::Io(_) => ErrorKind::Io,
            Error::Custom(_) => ErrorKind::Custom,
        }
    }

    /// The source span of a syntax error.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Syntax { span, .. } => Some(*span),
            _ => None,
        }
    }

    /// The file a syntax error was read from, if it was loaded from one.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        match self {
            Error::Syntax { path, .. } => path.as_deref(),
            _ => None,
        }
    }

    /// Attaches a source path to a syntax error; other errors pass through.
    #[must_use]
    pub fn with_source_path(self, source: &Path) -> Self {
        match self {
            Error::Syntax { message, span, .. } => Error::Syntax {
                message,
                span,
                path: Some(source.to_path_buf()),
            },
            other => other,
        }
    }
}

impl Error {
    /// Re-roots a located error under the map entry `key`.
    pub(crate) fn within_key(mut self, key: &str) -> Self {
        if let Some(at) = self.location_mut() {
            at.prepend_key(key);
        }
        self
    }

    /// Re-roots a located error under the sequence element `index`.
    pub(crate) fn within_index(mut self, index: usize) -> Self {
        if let Some(at) = self.location_mut() {
            at.prepend_index(index);
        }
        self
    }

    fn location_mut(&mut self) -> Option<&mut KeyPath> {
        match self {
            Error::UnsupportedType { at, .. }
            | Error::DuplicateKey { at, .. }
            | Error::InvalidKey { at, .. }
            | Error::ReservedKey { at, .. }
            | Error::DepthLimit { at, .. } => Some(at),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
