//! Schema node model

use crate::attributes::{AttributeRegistry, AttributeValue, Keyword};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Handle of a schema node inside one [`Environment`](crate::Environment)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaId(usize);

impl SchemaId {
    /// Create a handle from an arena index
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Arena index of this handle
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema#{}", self.0)
    }
}

/// A parsed schema document
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub(crate) uri: String,
    pub(crate) value: Value,
    pub(crate) meta: SchemaId,
    pub(crate) attributes: BTreeMap<Keyword, AttributeValue>,
    pub(crate) fragment_delimiter: char,
    pub(crate) definitions: Arc<AttributeRegistry>,
    pub(crate) extended_from: Vec<SchemaId>,
}

impl SchemaNode {
    pub(crate) fn new(uri: String, value: Value, meta: SchemaId, fragment_delimiter: char) -> Self {
        let definitions = Arc::new(AttributeRegistry::from_schema_value(&value));
        Self {
            uri,
            value,
            meta,
            attributes: BTreeMap::new(),
            fragment_delimiter,
            definitions,
            extended_from: Vec::new(),
        }
    }

    /// Identity URI
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Raw keyword map
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The schema describing this node
    #[must_use]
    pub fn meta(&self) -> SchemaId {
        self.meta
    }

    /// Parsed attributes in registry order
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<Keyword, AttributeValue> {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, keyword: &Keyword) -> Option<&AttributeValue> {
        self.attributes.get(keyword)
    }

    /// Whether the keyword appears in the raw document
    #[must_use]
    pub fn has_keyword(&self, name: &str) -> bool {
        self.value.get(name).is_some()
    }

    /// Delimiter used for fragment paths inside this document
    #[must_use]
    pub fn fragment_delimiter(&self) -> char {
        self.fragment_delimiter
    }

    /// The keyword definitions this node offers when used as a meta-schema
    #[must_use]
    pub fn definitions(&self) -> &AttributeRegistry {
        &self.definitions
    }

    /// Parents merged into this node through `extends`
    #[must_use]
    pub fn extended_from(&self) -> &[SchemaId] {
        &self.extended_from
    }

    pub(crate) fn remap(&mut self, map: &impl Fn(SchemaId) -> SchemaId) {
        self.meta = map(self.meta);
        for value in self.attributes.values_mut() {
            value.remap(map);
        }
        for parent in &mut self.extended_from {
            *parent = map(*parent);
        }
    }
}
