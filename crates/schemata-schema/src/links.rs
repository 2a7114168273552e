//! Hyper-schema links and href template expansion

use crate::model::SchemaId;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static HREF_TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("href template pattern is valid"));

/// Method used when a link does not name one
pub const DEFAULT_METHOD: &str = "GET";

/// A `links` entry of a hyper-schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// URI template; `{name}` expands to a property of the instance
    pub href: String,
    pub rel: String,
    pub method: String,
    pub enctype: Option<String>,
    /// Schemas for the link's submission properties
    pub properties: BTreeMap<String, SchemaId>,
    pub target_schema: Option<SchemaId>,
}

impl Link {
    /// Read the scalar parts of a raw link; nested schemas are filled in by
    /// the environment
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            href: text("href")?,
            rel: text("rel")?,
            method: text("method").unwrap_or_else(|| DEFAULT_METHOD.to_string()),
            enctype: text("enctype"),
            properties: BTreeMap::new(),
            target_schema: None,
        })
    }

    /// Expand the href against `instance` and resolve it against `base_uri`
    ///
    /// An empty expansion yields `None`.
    #[must_use]
    pub fn resolve(&self, instance: &Value, base_uri: &str) -> Option<String> {
        let expanded = expand_href(&self.href, instance);
        if expanded.is_empty() {
            None
        } else {
            Some(schemata_uri::resolve(base_uri, &expanded))
        }
    }

    pub(crate) fn schema_ids(&self) -> Vec<SchemaId> {
        self.properties
            .values()
            .copied()
            .chain(self.target_schema)
            .collect()
    }

    pub(crate) fn remap(&mut self, map: &impl Fn(SchemaId) -> SchemaId) {
        self.properties.values_mut().for_each(|id| *id = map(*id));
        self.target_schema = self.target_schema.map(map);
    }
}

fn template_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Substitute `{name}` with the instance's property and `{-this}` with the
/// instance itself; missing values become empty
///
/// ```rust
/// use schemata_schema::links::expand_href;
/// use serde_json::json;
///
/// let instance = json!({"id": 7, "kind": "book"});
/// assert_eq!(expand_href("/{kind}/{id}", &instance), "/book/7");
/// assert_eq!(expand_href("{missing}", &instance), "");
/// assert_eq!(expand_href("/v/{-this}", &json!("x")), "/v/x");
/// ```
#[must_use]
pub fn expand_href(href: &str, instance: &Value) -> String {
    HREF_TEMPLATE
        .replace_all(href, |caps: &Captures<'_>| {
            let name = &caps[1];
            if name == "-this" {
                template_value(instance)
            } else {
                instance.get(name).map(template_value).unwrap_or_default()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_from_value_defaults_method() {
        let link = Link::from_value(&json!({"href": "{id}", "rel": "self"})).unwrap();
        assert_eq!(link.method, "GET");
        assert!(link.enctype.is_none());
        assert!(Link::from_value(&json!({"rel": "self"})).is_none());
    }

    #[test]
    fn test_resolve_against_base() {
        let link = Link::from_value(&json!({"href": "{$ref}", "rel": "full"})).unwrap();
        let resolved = link.resolve(&json!({"$ref": "#/definitions/a"}), "urn:doc#/x");
        assert_eq!(resolved.as_deref(), Some("urn:doc#/definitions/a"));
        assert_eq!(link.resolve(&json!({}), "urn:doc#"), None);
    }

    #[test]
    fn test_expand_numbers_and_booleans() {
        let instance = json!({"n": 1.5, "b": true, "z": null});
        assert_eq!(expand_href("{n}-{b}-{z}", &instance), "1.5-true-");
    }

    #[test]
    fn test_remap_handles() {
        let mut link = Link::from_value(&json!({"href": "x", "rel": "create"})).unwrap();
        link.target_schema = Some(SchemaId::new(1));
        link.properties.insert("a".to_string(), SchemaId::new(1));
        link.remap(&|id| if id == SchemaId::new(1) { SchemaId::new(9) } else { id });
        assert_eq!(link.target_schema, Some(SchemaId::new(9)));
        assert_eq!(link.schema_ids(), vec![SchemaId::new(9), SchemaId::new(9)]);
    }
}
