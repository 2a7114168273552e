//! Instance views over raw values

use crate::traversal::{escape_pointer_token, extend_uri};
use crate::types::{PrimitiveType, json_equal};
use serde_json::Value;

/// A read-only view of one value being validated
///
/// `value` is `None` when the value does not exist at all, for example a
/// property that the parent object lacks. A JSON `null` is present and has
/// type `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance<'a> {
    value: Option<&'a Value>,
    uri: String,
    pointer: String,
    delimiter: char,
}

impl<'a> Instance<'a> {
    /// Create a root instance identified by `uri`
    ///
    /// Child URIs extend the fragment using `delimiter`.
    #[must_use]
    pub fn new(value: &'a Value, uri: impl Into<String>, delimiter: char) -> Self {
        Self {
            value: Some(value),
            uri: uri.into(),
            pointer: String::new(),
            delimiter,
        }
    }

    /// Create an instance for a value that does not exist
    #[must_use]
    pub fn absent(uri: impl Into<String>, pointer: impl Into<String>, delimiter: char) -> Self {
        Self {
            value: None,
            uri: uri.into(),
            pointer: pointer.into(),
            delimiter,
        }
    }

    /// The wrapped value, if present
    #[must_use]
    pub fn value(&self) -> Option<&'a Value> {
        self.value
    }

    /// Identity URI of this instance
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// JSON-pointer path from the root instance
    #[must_use]
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Fragment delimiter used when extending the URI
    #[must_use]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Whether the value exists
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    /// Most specific primitive type of the value, `None` if absent
    #[must_use]
    pub fn kind(&self) -> Option<PrimitiveType> {
        self.value.map(PrimitiveType::of)
    }

    /// Whether the value is present and of type `ty`
    #[must_use]
    pub fn is(&self, ty: PrimitiveType) -> bool {
        self.value.is_some_and(|v| ty.matches(v))
    }

    /// Navigate to an object member
    ///
    /// The result is absent when this instance is not an object or lacks
    /// the member.
    #[must_use]
    pub fn property(&self, key: &str) -> Instance<'a> {
        let value = self
            .value
            .and_then(Value::as_object)
            .and_then(|map| map.get(key));
        Instance {
            value,
            uri: extend_uri(&self.uri, self.delimiter, key),
            pointer: format!("{}/{}", self.pointer, escape_pointer_token(key)),
            delimiter: self.delimiter,
        }
    }

    /// Navigate to an array element
    #[must_use]
    pub fn item(&self, index: usize) -> Instance<'a> {
        let value = self
            .value
            .and_then(Value::as_array)
            .and_then(|items| items.get(index));
        let key = index.to_string();
        Instance {
            value,
            uri: extend_uri(&self.uri, self.delimiter, &key),
            pointer: format!("{}/{}", self.pointer, key),
            delimiter: self.delimiter,
        }
    }

    /// Raw value of a member, without building a child instance
    #[must_use]
    pub fn value_of_property(&self, key: &str) -> Option<&'a Value> {
        self.value
            .and_then(Value::as_object)
            .and_then(|map| map.get(key))
    }

    /// Child instances of an object, in key order
    #[must_use]
    pub fn properties(&self) -> Vec<(&'a str, Instance<'a>)> {
        match self.value.and_then(Value::as_object) {
            Some(map) => map
                .keys()
                .map(|key| (key.as_str(), self.property(key)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Child instances of an array
    #[must_use]
    pub fn items(&self) -> Vec<Instance<'a>> {
        match self.value.and_then(Value::as_array) {
            Some(items) => (0..items.len()).map(|i| self.item(i)).collect(),
            None => Vec::new(),
        }
    }

    /// Numeric-aware equality with a raw value; absent equals nothing
    #[must_use]
    pub fn equals(&self, other: &Value) -> bool {
        self.value.is_some_and(|v| json_equal(v, other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_navigation() {
        let value = json!({"a": {"b": "x"}});
        let root = Instance::new(&value, "urn:doc#", '/');
        let b = root.property("a").property("b");
        assert_eq!(b.value(), Some(&json!("x")));
        assert_eq!(b.uri(), "urn:doc#/a/b");
        assert_eq!(b.pointer(), "/a/b");
    }

    #[test]
    fn test_missing_property_is_absent() {
        let value = json!({"a": null});
        let root = Instance::new(&value, "urn:doc#", '.');
        let a = root.property("a");
        assert!(a.is_present());
        assert_eq!(a.kind(), Some(PrimitiveType::Null));

        let missing = root.property("b");
        assert!(!missing.is_present());
        assert_eq!(missing.kind(), None);
        assert_eq!(missing.uri(), "urn:doc#b");
    }

    #[test]
    fn test_items() {
        let value = json!([1, "two"]);
        let root = Instance::new(&value, "urn:doc#", '/');
        let items = root.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].pointer(), "/1");
        assert!(items[1].is(PrimitiveType::String));
        assert!(!root.item(5).is_present());
    }

    #[test]
    fn test_properties_in_key_order() {
        let value = json!({"b": 1, "a": 2});
        let root = Instance::new(&value, "urn:doc#", '/');
        let keys: Vec<&str> = root.properties().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_equals() {
        let value = json!({"n": 2});
        let root = Instance::new(&value, "urn:doc#", '/');
        assert!(root.property("n").equals(&json!(2.0)));
        assert!(!root.property("m").equals(&json!(null)));
    }

    #[test]
    fn test_pointer_escaping() {
        let value = json!({"a/b": 1});
        let root = Instance::new(&value, "urn:doc#", '/');
        assert_eq!(root.property("a/b").pointer(), "/a~1b");
    }
}
