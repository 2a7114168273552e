//! Cursor and path helpers for navigating raw values

use crate::Error;
use crate::Result;
use serde_json::Value;
use tracing::trace;

/// A cursor for navigating a raw value tree
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    /// Current value
    value: &'a Value,

    /// Path to current value (for error reporting)
    path: Vec<String>,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the given value
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        Self {
            value,
            path: Vec::new(),
        }
    }

    /// Get the current value
    #[must_use]
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Get the current path
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Current path as a JSON pointer
    #[must_use]
    pub fn pointer(&self) -> String {
        self.path
            .iter()
            .map(|segment| format!("/{}", escape_pointer_token(segment)))
            .collect()
    }

    /// Navigate to a member of an object
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the value is not an object or has no
    /// such member.
    pub fn child(&self, name: &str) -> Result<Cursor<'a>> {
        match self.value.get(name) {
            Some(child) if self.value.is_object() => Ok(self.descend(child, name.to_string())),
            _ => Err(Error::not_found(format!("{}/{}", self.pointer(), name))),
        }
    }

    /// Navigate to an element of an array
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the value is not an array or the index
    /// is out of bounds.
    pub fn child_at(&self, index: usize) -> Result<Cursor<'a>> {
        match self.value.as_array().and_then(|items| items.get(index)) {
            Some(child) => Ok(self.descend(child, index.to_string())),
            None => Err(Error::not_found(format!("{}/{}", self.pointer(), index))),
        }
    }

    /// Navigate along already-split path segments
    ///
    /// Numeric segments index into arrays; every other segment selects an
    /// object member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a missing member and
    /// [`Error::InvalidPath`] for a non-numeric index into an array.
    pub fn navigate<S: AsRef<str>>(&self, segments: &[S]) -> Result<Cursor<'a>> {
        let mut current = self.clone();
        for segment in segments {
            let segment = segment.as_ref();
            current = match current.value {
                Value::Array(_) => {
                    let index: usize = segment.parse().map_err(|_| {
                        Error::invalid_path(segment, "array index must be a non-negative integer")
                    })?;
                    current.child_at(index)?
                }
                Value::Object(_) => current.child(segment)?,
                other => {
                    return Err(Error::type_mismatch(
                        "object or array",
                        crate::PrimitiveType::of(other).as_str(),
                    ));
                }
            };
        }
        trace!(pointer = %current.pointer(), "navigated value path");
        Ok(current)
    }

    fn descend(&self, value: &'a Value, segment: String) -> Cursor<'a> {
        let mut path = self.path.clone();
        path.push(segment);
        Cursor { value, path }
    }
}

/// Escape a JSON-pointer reference token (`~` then `/`)
#[must_use]
pub fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Unescape a JSON-pointer reference token
#[must_use]
pub fn unescape_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Split a URI fragment into path segments
///
/// With a `/` delimiter the fragment is read as a JSON pointer: the leading
/// slash is optional and tokens are percent-decoded and unescaped. With any
/// other delimiter the fragment is a plain delimited property path.
#[must_use]
pub fn fragment_segments(fragment: &str, delimiter: char) -> Vec<String> {
    if delimiter == '/' {
        let fragment = fragment.strip_prefix('/').unwrap_or(fragment);
        if fragment.is_empty() {
            return Vec::new();
        }
        fragment
            .split('/')
            .map(|token| unescape_pointer_token(&schemata_uri::unescape_component(token)))
            .collect()
    } else {
        fragment
            .split(delimiter)
            .filter(|segment| !segment.is_empty())
            .map(schemata_uri::unescape_component)
            .collect()
    }
}

/// Extend a URI's fragment path by one key
///
/// ```rust
/// use schemata_ir::extend_uri;
///
/// assert_eq!(extend_uri("urn:x#", '/', "a"), "urn:x#/a");
/// assert_eq!(extend_uri("urn:x#/a", '/', "b"), "urn:x#/a/b");
/// assert_eq!(extend_uri("urn:x", '.', "a"), "urn:x#a");
/// assert_eq!(extend_uri("urn:x#a", '.', "b"), "urn:x#a.b");
/// ```
#[must_use]
pub fn extend_uri(uri: &str, delimiter: char, key: &str) -> String {
    let (base, fragment) = uri.split_once('#').unwrap_or((uri, ""));
    let key = if delimiter == '/' {
        escape_pointer_token(key)
    } else {
        key.to_string()
    };

    if fragment.is_empty() {
        if delimiter == '/' {
            format!("{base}#/{key}")
        } else {
            format!("{base}#{key}")
        }
    } else {
        format!("{base}#{fragment}{delimiter}{key}")
    }
}
