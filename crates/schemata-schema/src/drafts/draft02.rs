//! Draft 02: slash-delimited fragments, `uniqueItems`, `divisibleBy`,
//! link target schemas; `maxDecimal` is gone

use super::{DraftDocuments, derive};
use crate::inheritance::remove_keywords;
use serde_json::json;

pub(super) fn documents() -> DraftDocuments {
    let previous = super::draft01::documents();
    let (schema_uri, hyper_uri, links_uri) = super::Draft::Draft02.uris();

    let mut schema = derive(
        &previous.schema,
        &json!({
            "properties": {
                "uniqueItems": {"type": "boolean", "optional": true, "default": false},
                "divisibleBy": {
                    "type": "number",
                    "minimum": 0,
                    "minimumCanEqual": false,
                    "optional": true,
                    "default": 1
                }
            },
            "fragmentResolution": "slash-delimited"
        }),
        &hyper_uri,
        &schema_uri,
    );
    if let Some(properties) = schema.get_mut("properties") {
        remove_keywords(properties, &["maxDecimal"]);
    }

    let hyper = derive(
        &previous.hyper,
        &json!({
            "properties": {
                "fragmentResolution": {"default": "slash-delimited"}
            }
        }),
        &hyper_uri,
        &hyper_uri,
    );

    let links = derive(
        &previous.links,
        &json!({
            "properties": {
                "targetSchema": {"$ref": "hyper-schema#", "optional": true}
            }
        }),
        &hyper_uri,
        &links_uri,
    );

    DraftDocuments { schema, hyper, links }
}
