//! Draft 03: `required` replaces `optional`, exclusive bounds, pattern
//! properties, additional items and property dependencies

use super::{DraftDocuments, derive};
use crate::inheritance::remove_keywords;
use serde_json::{Value, json};

/// Keywords draft 03 no longer defines
const DROPPED: &[&str] = &["optional", "requires", "minimumCanEqual", "maximumCanEqual"];

pub(super) fn documents() -> DraftDocuments {
    let previous = super::draft02::documents();
    let (schema_uri, hyper_uri, links_uri) = super::Draft::Draft03.uris();

    let mut schema = derive(
        &previous.schema,
        &json!({
            "properties": {
                "patternProperties": {
                    "type": "object",
                    "additionalProperties": {"$ref": "#"},
                    "default": {}
                },
                "additionalItems": {
                    "type": [{"$ref": "#"}, "boolean"],
                    "default": {}
                },
                "required": {
                    "type": "boolean",
                    "default": false,
                    "validationRequired": true
                },
                "dependencies": {
                    "type": "object",
                    "additionalProperties": {
                        "type": ["string", "array", {"$ref": "#"}],
                        "items": {"type": "string"}
                    },
                    "default": {}
                },
                "exclusiveMinimum": {"type": "boolean", "default": false},
                "exclusiveMaximum": {"type": "boolean", "default": false},
                "disallow": {
                    "items": {"type": ["string", {"$ref": "#"}]},
                    "uniqueItems": true
                },
                "$schema": {"type": "string", "format": "uri"},
                "id": {"type": "string", "format": "uri"},
                "$ref": {"type": "string", "format": "uri"}
            },
            "dependencies": {
                "exclusiveMinimum": "minimum",
                "exclusiveMaximum": "maximum"
            }
        }),
        &hyper_uri,
        &schema_uri,
    );
    if let Some(properties) = schema.get_mut("properties") {
        remove_keywords(properties, DROPPED);
        if let Some(divisible) = properties
            .get_mut("divisibleBy")
            .and_then(Value::as_object_mut)
        {
            divisible.remove("minimumCanEqual");
            divisible.insert("exclusiveMinimum".to_string(), json!(true));
        }
    }
    strip_optional(&mut schema);

    let mut hyper = derive(&previous.hyper, &json!({}), &hyper_uri, &hyper_uri);
    strip_optional(&mut hyper);

    let mut links = derive(&previous.links, &json!({}), &hyper_uri, &links_uri);
    strip_optional(&mut links);
    for name in ["href", "rel"] {
        if let Some(definition) = links
            .pointer_mut(&format!("/properties/{name}"))
            .and_then(Value::as_object_mut)
        {
            definition.insert("required".to_string(), json!(true));
        }
    }

    DraftDocuments { schema, hyper, links }
}

/// Drop the `optional` flag from a document and its property definitions
fn strip_optional(document: &mut Value) {
    remove_keywords(document, &["optional"]);
    if let Some(properties) = document.get_mut("properties").and_then(Value::as_object_mut) {
        for definition in properties.values_mut() {
            remove_keywords(definition, &["optional"]);
        }
    }
}
