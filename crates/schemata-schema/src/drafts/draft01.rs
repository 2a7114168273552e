//! Draft 01: draft 00 under new identifiers

use super::{DraftDocuments, derive};
use serde_json::json;

pub(super) fn documents() -> DraftDocuments {
    let previous = super::draft00::documents();
    let (schema, hyper, links) = super::Draft::Draft01.uris();

    DraftDocuments {
        schema: derive(&previous.schema, &json!({}), &hyper, &schema),
        hyper: derive(&previous.hyper, &json!({}), &hyper, &hyper),
        links: derive(&previous.links, &json!({}), &hyper, &links),
    }
}
