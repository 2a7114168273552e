//! Draft 00: dot-delimited fragments, `optional`/`requires` keywords

use super::DraftDocuments;
use serde_json::json;

const SCHEMA_URI: &str = "http://json-schema.org/draft-00/schema#";
const HYPER_URI: &str = "http://json-schema.org/draft-00/hyper-schema#";
const LINKS_URI: &str = "http://json-schema.org/draft-00/links#";

pub(super) fn documents() -> DraftDocuments {
    DraftDocuments {
        schema: json!({
            "$schema": HYPER_URI,
            "id": SCHEMA_URI,
            "type": "object",

            "properties": {
                "type": {
                    "type": ["string", "array"],
                    "items": {"type": ["string", {"$ref": "#"}]},
                    "optional": true,
                    "uniqueItems": true,
                    "default": "any"
                },
                "properties": {
                    "type": "object",
                    "additionalProperties": {"$ref": "#"},
                    "optional": true,
                    "default": {}
                },
                "items": {
                    "type": [{"$ref": "#"}, "array"],
                    "items": {"$ref": "#"},
                    "optional": true,
                    "default": {}
                },
                "optional": {
                    "type": "boolean",
                    "optional": true,
                    "default": false,
                    "validationRequired": true
                },
                "additionalProperties": {
                    "type": [{"$ref": "#"}, "boolean"],
                    "optional": true,
                    "default": {}
                },
                "requires": {
                    "type": ["string", {"$ref": "#"}],
                    "optional": true
                },
                "minimum": {"type": "number", "optional": true},
                "maximum": {"type": "number", "optional": true},
                "minimumCanEqual": {
                    "type": "boolean",
                    "optional": true,
                    "requires": "minimum",
                    "default": true
                },
                "maximumCanEqual": {
                    "type": "boolean",
                    "optional": true,
                    "requires": "maximum",
                    "default": true
                },
                "minItems": {"type": "integer", "optional": true, "minimum": 0, "default": 0},
                "maxItems": {"type": "integer", "optional": true, "minimum": 0},
                "pattern": {"type": "string", "optional": true, "format": "regex"},
                "minLength": {"type": "integer", "optional": true, "minimum": 0, "default": 0},
                "maxLength": {"type": "integer", "optional": true},
                "enum": {"type": "array", "optional": true, "minItems": 1},
                "title": {"type": "string", "optional": true},
                "description": {"type": "string", "optional": true},
                "format": {"type": "string", "optional": true},
                "contentEncoding": {"type": "string", "optional": true},
                "default": {"type": "any", "optional": true},
                "maxDecimal": {"type": "integer", "optional": true, "minimum": 0},
                "disallow": {
                    "type": ["string", "array"],
                    "items": {"type": "string"},
                    "optional": true
                },
                "extends": {
                    "type": [{"$ref": "#"}, "array"],
                    "items": {"$ref": "#"},
                    "optional": true,
                    "default": {}
                }
            },

            // Carried on the base schema too, so documents that name it as
            // their `$schema` still resolve `$ref` and `id`.
            "links": super::core_links(),

            "optional": true,
            "default": {},
            "fragmentResolution": "dot-delimited"
        }),

        hyper: json!({
            "$schema": HYPER_URI,
            "id": HYPER_URI,

            "properties": {
                "links": {
                    "type": "array",
                    "items": {"$ref": "links#"},
                    "optional": true
                },
                "fragmentResolution": {
                    "type": "string",
                    "optional": true,
                    "default": "dot-delimited"
                },
                "root": {"type": "boolean", "optional": true, "default": false},
                "readonly": {"type": "boolean", "optional": true, "default": false},
                "pathStart": {"type": "string", "optional": true, "format": "uri"},
                "mediaType": {"type": "string", "optional": true, "format": "media-type"},
                "alternate": {
                    "type": "array",
                    "items": {"$ref": "#"},
                    "optional": true
                }
            },

            "links": super::core_links()
        }),

        links: json!({
            "$schema": HYPER_URI,
            "id": LINKS_URI,
            "type": "object",

            "properties": {
                "href": {"type": "string"},
                "rel": {"type": "string"},
                "method": {"type": "string", "default": "GET", "optional": true},
                "enctype": {"type": "string", "requires": "method", "optional": true},
                "properties": {
                    "type": "object",
                    "additionalProperties": {"$ref": "hyper-schema#"},
                    "optional": true
                }
            }
        }),
    }
}
