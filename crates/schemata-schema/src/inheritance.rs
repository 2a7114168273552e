//! Raw schema merging for `extends` and draft derivation

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// `extends` edges between schema URIs, child to parents
#[derive(Debug, Clone, Default)]
pub struct InheritanceGraph {
    parents: BTreeMap<String, BTreeSet<String>>,
}

impl InheritanceGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `child` extends `parent`
    pub fn add_edge(&mut self, child: impl Into<String>, parent: impl Into<String>) {
        self.parents.entry(child.into()).or_default().insert(parent.into());
    }

    /// Whether `child` extending `parent` would close a loop
    #[must_use]
    pub fn would_create_cycle(&self, child: &str, parent: &str) -> bool {
        let mut seen = BTreeSet::new();
        let mut pending = vec![parent];
        while let Some(uri) = pending.pop() {
            if uri == child {
                return true;
            }
            if seen.insert(uri) {
                pending.extend(self.parents_of(uri));
            }
        }
        false
    }

    /// Parents recorded for `child`
    pub fn parents_of<'a>(&'a self, child: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.parents
            .get(child)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}

/// Deep-merge `overlay` onto `base`
///
/// Objects merge key by key with the overlay winning, recursively. Any
/// other overlay value replaces the base value outright, so arrays are not
/// concatenated.
///
/// ```rust
/// use schemata_schema::inherits;
/// use serde_json::json;
///
/// let merged = inherits(
///     &json!({"type": "object", "properties": {"a": {"type": "string"}}}),
///     &json!({"properties": {"b": {}}, "maximum": 3}),
/// );
/// assert_eq!(merged, json!({
///     "type": "object",
///     "properties": {"a": {"type": "string"}, "b": {}},
///     "maximum": 3
/// }));
/// ```
#[must_use]
pub fn inherits(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let value = match base_map.get(key) {
                    Some(base_value) => inherits(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        _ => overlay.clone(),
    }
}

/// Fold parents from first to last, then the child, into one raw schema
#[must_use]
pub fn merge_all(parents: &[&Value], child: &Value) -> Value {
    let base = parents
        .iter()
        .fold(Value::Object(serde_json::Map::new()), |acc, parent| {
            inherits(&acc, parent)
        });
    inherits(&base, child)
}

/// Remove top-level keywords from a raw schema
pub fn remove_keywords(value: &mut Value, keywords: &[&str]) {
    if let Some(map) = value.as_object_mut() {
        for keyword in keywords {
            map.remove(*keyword);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overlay_scalars_win() {
        let merged = inherits(&json!({"minimum": 0, "title": "a"}), &json!({"minimum": 5}));
        assert_eq!(merged, json!({"minimum": 5, "title": "a"}));
    }

    #[test]
    fn test_properties_union() {
        let parent = json!({"properties": {"a": {"type": "string"}, "b": {"type": "number"}}});
        let child = json!({"properties": {"b": {"minimum": 1}, "c": {}}});
        let merged = inherits(&parent, &child);
        assert_eq!(
            merged["properties"],
            json!({
                "a": {"type": "string"},
                "b": {"type": "number", "minimum": 1},
                "c": {}
            })
        );
    }

    #[test]
    fn test_arrays_are_replaced() {
        let merged = inherits(&json!({"enum": [1, 2]}), &json!({"enum": [3]}));
        assert_eq!(merged, json!({"enum": [3]}));
    }

    #[test]
    fn test_merge_with_empty_overlay_is_identity() {
        let base = json!({"type": "object", "properties": {"a": {"enum": [1]}}});
        assert_eq!(inherits(&base, &json!({})), base);
        assert_eq!(inherits(&inherits(&base, &json!({})), &json!({})), base);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let base = json!({"a": {"b": 1}});
        let overlay = json!({"a": {"c": 2}});
        let once = inherits(&base, &overlay);
        assert_eq!(inherits(&once, &overlay), once);
    }

    #[test]
    fn test_merge_all_order() {
        let first = json!({"title": "first", "minimum": 0});
        let second = json!({"title": "second"});
        let child = json!({"maximum": 9});
        let merged = merge_all(&[&first, &second], &child);
        assert_eq!(merged, json!({"title": "second", "minimum": 0, "maximum": 9}));
    }

    #[test]
    fn test_remove_keywords() {
        let mut value = json!({"extends": {}, "type": "string", "optional": true});
        remove_keywords(&mut value, &["extends", "optional", "absent"]);
        assert_eq!(value, json!({"type": "string"}));
    }

    #[test]
    fn test_extends_loops() {
        let mut graph = InheritanceGraph::new();
        graph.add_edge("urn:a#", "urn:b#");
        graph.add_edge("urn:b#", "urn:c#");
        graph.add_edge("urn:a#", "urn:d#");

        assert!(graph.would_create_cycle("urn:c#", "urn:a#"));
        assert!(graph.would_create_cycle("urn:a#", "urn:a#"));
        assert!(!graph.would_create_cycle("urn:d#", "urn:c#"));
        assert_eq!(graph.parents_of("urn:a#").collect::<Vec<_>>(), vec!["urn:b#", "urn:d#"]);
        assert_eq!(graph.parents_of("urn:z#").count(), 0);
    }
}
