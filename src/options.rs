//! Configuration options for decoding and encoding.
//!
//! [`Options`] is shared by both directions. The defaults match what
//! [`loads`](crate::loads) and [`dumps`](crate::dumps) use.
//!
//! ## Examples
//!
//! ```rust
//! use toml_native::{dumps_with_options, value, ErrorKind, Options};
//!
//! let doc = value!({ "name": "demo", "license": null });
//!
//! // Nulls are dropped from tables by default
//! let text = dumps_with_options(&doc, &Options::new()).unwrap();
//! assert_eq!(text, "name = \"demo\"\n");
//!
//! // ...or rejected
//! let strict = Options::new().with_skip_nulls(false);
//! let err = dumps_with_options(&doc, &strict).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Schema);
//! ```

use std::path::{Path, PathBuf};

/// Nesting limit applied when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration for a single `loads` or `dumps` call.
///
/// # Examples
///
/// ```rust
/// use toml_native::Options;
///
/// let options = Options::new()
///     .with_max_depth(16)
///     .with_source_path("config/app.toml");
/// assert_eq!(options.max_depth, 16);
/// assert!(options.skip_nulls);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of nested containers below the root table.
    pub max_depth: usize,
    /// Drop `null` table entries on encode instead of rejecting them.
    pub skip_nulls: bool,
    /// Reported as the origin of syntax errors.
    pub source_path: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_depth: DEFAULT_MAX_DEPTH,
            skip_nulls: true,
            source_path: None,
        }
    }
}

impl Options {
    /// Creates default options (depth limit 128, nulls skipped, no source path).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_native::Options;
    ///
    /// let options = Options::new();
    /// assert_eq!(options.max_depth, 128);
    /// assert!(options.source_path.is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets whether `null` entries in tables are omitted (`true`) or
    /// reported as schema errors (`false`). Nulls inside arrays are always
    /// rejected.
    #[must_use]
    pub fn with_skip_nulls(mut self, skip_nulls: bool) -> Self {
        self.skip_nulls = skip_nulls;
        self
    }

    #[must_use]
    pub fn with_source_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_path = Some(path.as_ref().to_path_buf());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let options = Options::new()
            .with_max_depth(3)
            .with_skip_nulls(false)
            .with_source_path("a.toml");
        assert_eq!(options.max_depth, 3);
        assert!(!options.skip_nulls);
        assert_eq!(options.source_path.as_deref(), Some(Path::new("a.toml")));
    }

    #[test]
    fn test_default_matches_new() {
        assert_eq!(Options::default(), Options::new());
    }
}
