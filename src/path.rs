//! Structural paths used to name the property an issue belongs to.
//!
//! A [`JsonPath`] records where the decoder was in the input tree when a problem
//! occurred. Rendered with [`Display`], it yields the normalized property name used
//! by [`PropertyIssue`](crate::PropertyIssue): segments joined with `.`, array
//! indices as plain numbers (`zoo.1.colorEnum`).

use std::fmt::{self, Display};

/// A segment of a structural path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field/property access (e.g., `user`, `colorEnum`)
    Field(String),
    /// An array or collection index (e.g., `0`, `42`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// A path to a value in a nested JSON-like structure.
///
/// # Example
///
/// ```rust
/// use salvage::JsonPath;
///
/// let path = JsonPath::root()
///     .push_field("zoo")
///     .push_index(1)
///     .push_field("colorEnum");
///
/// assert_eq!(path.to_string(), "zoo.1.colorEnum");
/// assert_eq!(path.to_pointer(), "/zoo/1/colorEnum");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Parses a JSON Pointer such as `/zoo/1/colorEnum`.
    ///
    /// Segments consisting only of ASCII digits become [`PathSegment::Index`];
    /// `~1` and `~0` are unescaped to `/` and `~`. An empty pointer is the root.
    pub fn from_pointer(pointer: &str) -> Self {
        let trimmed = pointer.strip_prefix('/').unwrap_or(pointer);
        if trimmed.is_empty() {
            return Self::root();
        }

        let segments = trimmed
            .split('/')
            .map(|raw| {
                let is_index = !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit());
                match raw.parse::<usize>() {
                    Ok(idx) if is_index => PathSegment::Index(idx),
                    _ => PathSegment::Field(raw.replace("~1", "/").replace("~0", "~")),
                }
            })
            .collect();

        Self { segments }
    }

    /// Returns a new path with a field segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the parent path (all segments except the last), or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Renders the path as a JSON Pointer (`/zoo/1/colorEnum`).
    pub fn to_pointer(&self) -> String {
        let mut pointer = String::new();
        for segment in &self.segments {
            pointer.push('/');
            match segment {
                PathSegment::Field(name) => {
                    pointer.push_str(&name.replace('~', "~0").replace('/', "~1"))
                }
                PathSegment::Index(idx) => pointer.push_str(&idx.to_string()),
            }
        }
        pointer
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Field(name) if name.contains(['.', '~']) => {
                    write!(f, "{}", name.replace('~', "~0").replace('.', "~1"))?
                }
                PathSegment::Field(name) => f.write_str(name)?,
                PathSegment::Index(idx) => write!(f, "{}", idx)?,
            }
        }
        Ok(())
    }
}
