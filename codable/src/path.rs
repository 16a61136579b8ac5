use std::fmt;

/// A single segment in a coding path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An index into a sequence.
    Index(usize),
    /// A string key into a keyed container.
    Key(String),
}

/// The location of a value relative to the root being decoded.
///
/// Every [`Decoder`](crate::Decoder) knows its path so errors can point at
/// the offending value.  The display form joins keys with dots and renders
/// indexes in brackets (`data.items[2].id`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Returns the root path.
    pub fn root() -> Path {
        Path::default()
    }

    /// Returns the segments of the path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns `true` for the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path with a key appended.
    pub fn join_key(&self, key: &str) -> Path {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Path { segments }
    }

    /// Returns a new path with an index appended.
    pub fn join_index(&self, index: usize) -> Path {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Path { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str(".");
        }
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if idx > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[test]
fn test_display() {
    let path = Path::root().join_key("data").join_key("items").join_index(2).join_key("id");
    assert_eq!(path.to_string(), "data.items[2].id");
    assert_eq!(Path::root().to_string(), ".");
}
