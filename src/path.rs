//! Location of a value inside a native structure.
//!
//! Native values carry no source text, so encode diagnostics point at the
//! offending entry with a [`KeyPath`] instead of a line/column span. The same
//! type tracks nesting during decode, where it feeds depth-limit errors.
//!
//! ```rust
//! use toml_native::KeyPath;
//!
//! let mut path = KeyPath::root();
//! path.push_key("servers");
//! path.push_key("alpha beta");
//! path.push_index(2);
//! assert_eq!(path.to_string(), r#"servers."alpha beta"[2]"#);
//! ```

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// A dotted/indexed path from the document root to a nested value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    /// The empty path, pointing at the document root.
    #[must_use]
    pub fn root() -> Self {
        KeyPath::default()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments, which is also the nesting depth of the value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push_key(&mut self, key: &str) {
        self.segments.push(Segment::Key(key.to_string()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// Nests this path under `key`, used while an error bubbles out of a
    /// value that was built bottom-up.
    pub(crate) fn prepend_key(&mut self, key: &str) {
        self.segments.insert(0, Segment::Key(key.to_string()));
    }

    pub(crate) fn prepend_index(&mut self, index: usize) {
        self.segments.insert(0, Segment::Index(index));
    }

    /// Returns a copy of this path extended by `key`.
    #[must_use]
    pub fn join_key(&self, key: &str) -> Self {
        let mut path = self.clone();
        path.push_key(key);
        path
    }
}

/// TOML bare keys: `A-Za-z0-9_-`, non-empty.
fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    if is_bare_key(key) {
                        f.write_str(key)?;
                    } else {
                        write!(f, "\"{}\"", key.replace('\\', "\\\\").replace('"', "\\\""))?;
                    }
                }
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(KeyPath::root().to_string(), "<root>");
        assert!(KeyPath::root().is_root());
    }

    #[test]
    fn test_quoted_segments() {
        let mut path = KeyPath::root();
        path.push_key("a");
        path.push_key("");
        path.push_key("say \"hi\"");
        assert_eq!(path.to_string(), "a.\"\".\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_index_after_root() {
        let mut path = KeyPath::root();
        path.push_index(0);
        path.push_key("name");
        assert_eq!(path.to_string(), "[0].name");
        path.pop();
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_prepend() {
        let mut path = KeyPath::root().join_key("leaf");
        path.prepend_index(3);
        path.prepend_key("outer");
        assert_eq!(path.to_string(), "outer[3].leaf");
    }
}
