//! Canonical column-path encoding.
//!
//! Mapping code names a worksheet column either by its flat header name
//! (`"age"`) or, for columns nested inside repeated tables, by a bracketed
//! segment list (`"[people,address,zip]"`). The bracket/comma form is a tiny
//! serialization of path structure, so it gets a real parser here instead of
//! ad-hoc character scanning: everything downstream (anchor selection in
//! particular) works on the parsed [`ColumnPath`] and stays independent of
//! incidental string layout.
//!
//! **Depth** is the number of segment separators: a flat name or a
//! single-segment bracketed path has depth 0, `"[a,b,c]"` has depth 2. The
//! special form `"[]"` (no segments) also has depth 0; it is a valid, if
//! useless, path, not a parse error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed column path: either a flat header name or a nested segment list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnPath {
    /// A top-level column, named directly.
    Flat(String),
    /// A column inside one or more nested tables, outermost segment first.
    Nested(Vec<String>),
}

impl ColumnPath {
    /// Parse the string encoding.
    ///
    /// Anything not starting with `[` is a flat name, taken verbatim. A
    /// bracketed path is tokenized on `[`, `]` and `,`; empty segments are
    /// kept so that malformed inputs still count separators the same way the
    /// raw encoding does.
    pub fn parse(raw: &str) -> Self {
        let Some(inner) = raw.strip_prefix('[') else {
            return ColumnPath::Flat(raw.to_string());
        };
        let inner = inner.strip_suffix(']').unwrap_or(inner);
        if inner.is_empty() {
            return ColumnPath::Nested(Vec::new());
        }
        ColumnPath::Nested(inner.split(',').map(str::to_string).collect())
    }

    /// Build a nested path from segments.
    pub fn nested<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        ColumnPath::Nested(segments.into_iter().map(Into::into).collect())
    }

    /// Nesting depth: the number of segment separators.
    ///
    /// Flat paths and single-segment (or empty) bracketed paths are depth 0.
    pub fn depth(&self) -> usize {
        match self {
            ColumnPath::Flat(_) => 0,
            ColumnPath::Nested(segments) => segments.len().saturating_sub(1),
        }
    }

    /// The innermost segment, if any.
    pub fn leaf(&self) -> Option<&str> {
        match self {
            ColumnPath::Flat(name) => Some(name.as_str()),
            ColumnPath::Nested(segments) => segments.last().map(String::as_str),
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, ColumnPath::Nested(_))
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnPath::Flat(name) => f.write_str(name),
            ColumnPath::Nested(segments) => write!(f, "[{}]", segments.join(",")),
        }
    }
}
