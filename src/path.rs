//! Field paths for locating values inside nested records.
//!
//! Every [`SchemaError`](crate::SchemaError) carries a [`FieldPath`] naming the
//! value that failed, e.g. `address.street` or `tags[2]`.

use std::fmt::{self, Display};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object key (e.g. `username`).
    Key(String),
    /// An array position (e.g. `[0]`).
    Index(usize),
}

/// The location of a value relative to the value passed to `validate`.
///
/// Paths are immutable; `key` and `index` return extended copies so a parent
/// path can be reused for every child.
///
/// # Example
///
/// ```rust
/// use conform::FieldPath;
///
/// let path = FieldPath::root().key("orders").index(3).key("sku");
/// assert_eq!(path.to_string(), "orders[3].sku");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path, pointing at the validated value itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns this path extended by an object key.
    pub fn key(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(name.into()));
        Self { segments }
    }

    /// Returns this path extended by an array index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the final segment, or `None` at the root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// The name used for this location in error messages.
    ///
    /// The root is called `value`; anything else uses its display form.
    pub fn label(&self) -> String {
        if self.is_root() {
            "value".to_string()
        } else {
            self.to_string()
        }
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Key(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
