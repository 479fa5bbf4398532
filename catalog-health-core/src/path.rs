//! Dotted path lookups into JSON entities.

use std::fmt;

use serde_json::Value;

/// A dotted path (`meta.tier`) into a JSON entity.
///
/// Lookups never fail loudly: a missing key, or an intermediate value that is
/// not an object, simply yields `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Build a path from individual segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a dotted path, ignoring empty segments.
    pub fn parse(path: &str) -> Self {
        Self::new(
            path.split('.')
                .map(str::trim)
                .filter(|segment| !segment.is_empty()),
        )
    }

    /// Path segments from the root.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend the path with one more segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Resolve the path against an entity.
    pub fn lookup<'a>(&self, entity: &'a Value) -> Option<&'a Value> {
        if self.segments.is_empty() {
            return None;
        }
        self.segments
            .iter()
            .try_fold(entity, |current, segment| current.as_object()?.get(segment))
    }

    /// Resolve the path and read the value as a string slice.
    pub fn lookup_str<'a>(&self, entity: &'a Value) -> Option<&'a str> {
        self.lookup(entity).and_then(Value::as_str)
    }

    /// Resolve the path and read the value as a number.
    pub fn lookup_f64(&self, entity: &Value) -> Option<f64> {
        self.lookup(entity).and_then(Value::as_f64)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
